use crate::any_arc::ArcAny;
use crate::errors::{InteropError, InteropResult};
use crate::identity::NativeResource;
use crate::interop_registry::InteropRegistry;
use crate::registration::Registration;
use crate::wrapper::{InteropWrapper, WrapperRef};
use std::fmt;
use std::sync::Arc;

type MatchFn = dyn Fn(&dyn NativeResource) -> bool + Send + Sync;
type ConstructFn =
    dyn Fn(Arc<dyn NativeResource>, &ProbeContext<'_>, Registration) -> InteropResult<WrapperRef> + Send + Sync;

/// 探针构造包装对象时可用的上下文
pub struct ProbeContext<'a> {
    /// 调用方指定的所属设备
    pub device: Option<&'a WrapperRef>,
    /// 调用方指定的 DPI，0 表示未指定
    pub dpi: f32,
    /// 发起构造的注册表
    ///
    /// 构造期间注册表锁仍被当前线程持有，可以重入请求其它资源（例如所属设备）。
    pub registry: &'a InteropRegistry,
}

/// 探针：原生子类型匹配 + 附加谓词 + 包装对象构造函数
///
/// 全局注册表按注册顺序逐个尝试探针，第一个匹配的探针负责构造。
/// 同一原生类型存在细分（例如可作为渲染目标的位图）时，更具体的探针要排在前面，
/// 并用谓词区分。
pub struct Probe {
    name: &'static str,
    native_type: &'static str,
    matches: Box<MatchFn>,
    construct: Box<ConstructFn>,
}

// new & init
impl Probe {
    /// 匹配所有 `N` 类型原生资源的探针
    pub fn new<N, W, F>(name: &'static str, construct: F) -> Self
    where
        N: NativeResource,
        W: InteropWrapper,
        F: Fn(Arc<N>, &ProbeContext<'_>, Registration) -> InteropResult<Arc<W>> + Send + Sync + 'static,
    {
        Self::with_predicate(name, |_: &N| true, construct)
    }

    /// 只匹配满足 `predicate` 的 `N` 类型原生资源
    ///
    /// 谓词在注册表锁内、持有内部状态借用时执行，不得回调注册表。
    pub fn with_predicate<N, W, P, F>(name: &'static str, predicate: P, construct: F) -> Self
    where
        N: NativeResource,
        W: InteropWrapper,
        P: Fn(&N) -> bool + Send + Sync + 'static,
        F: Fn(Arc<N>, &ProbeContext<'_>, Registration) -> InteropResult<Arc<W>> + Send + Sync + 'static,
    {
        let native_type = std::any::type_name::<N>();
        Self {
            name,
            native_type,
            matches: Box::new(move |resource: &dyn NativeResource| {
                ArcAny::as_any(resource).downcast_ref::<N>().is_some_and(|native| predicate(native))
            }),
            construct: Box::new(
                move |resource: Arc<dyn NativeResource>, context: &ProbeContext<'_>, registration: Registration| {
                    let native = ArcAny::into_any_arc(resource)
                        .downcast::<N>()
                        .map_err(|_| InteropError::UnknownResourceType { type_name: native_type })?;
                    let wrapper: WrapperRef = construct(native, context, registration)?;
                    Ok(wrapper)
                },
            ),
        }
    }
}

// getter
impl Probe {
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 探针识别的原生类型名
    #[inline]
    pub fn native_type(&self) -> &'static str {
        self.native_type
    }
}

// tools
impl Probe {
    #[inline]
    pub(crate) fn matches(&self, resource: &dyn NativeResource) -> bool {
        (self.matches)(resource)
    }

    #[inline]
    pub(crate) fn construct(
        &self,
        resource: Arc<dyn NativeResource>,
        context: &ProbeContext<'_>,
        registration: Registration,
    ) -> InteropResult<WrapperRef> {
        (self.construct)(resource, context, registration)
    }
}

impl fmt::Debug for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Probe").field("name", &self.name).field("native_type", &self.native_type).finish()
    }
}
