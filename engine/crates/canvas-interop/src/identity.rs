use crate::any_arc::ArcAny;
use std::fmt;
use std::sync::Arc;

/// 原生资源
///
/// 原生对象以 `Arc` 共享，引用计数即其生命周期。缓存只关心两件事：
/// 对象的规范身份，以及能否被某个探针识别为具体的原生类型。
pub trait NativeResource: ArcAny {
    /// 规范对象
    ///
    /// 大多数原生对象只有一个共享分配，身份就是分配地址，返回 `None` 即可。
    /// 如果一个原生对象通过多个独立的接口对象暴露（例如位图的 image 接口），
    /// 接口对象需要返回底层对象，保证"同一个资源，不同接口"映射到同一个缓存条目。
    ///
    /// 规范对象自身必须返回 `None`。
    fn canonical(&self) -> Option<Arc<dyn NativeResource>> {
        None
    }
}

/// 原生资源的规范身份
///
/// 取自规范对象共享分配的地址。只要原生对象活着，身份就稳定；
/// 包装对象持有原生对象的强引用，因此缓存条目存在期间地址不会被复用。
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceIdentity(usize);

impl ResourceIdentity {
    /// 直接取 `Arc` 分配地址，不经过 [`NativeResource::canonical`]
    #[inline]
    pub fn from_arc<T: ?Sized>(resource: &Arc<T>) -> Self {
        Self(Arc::as_ptr(resource) as *const () as usize)
    }

    /// 解析原生资源的规范身份
    pub fn resolve<N: NativeResource + ?Sized>(resource: &Arc<N>) -> Self {
        match (**resource).canonical() {
            Some(canonical) => Self::from_arc(&canonical),
            None => Self::from_arc(resource),
        }
    }

    #[inline]
    pub fn raw(&self) -> usize {
        self.0
    }
}

impl fmt::Debug for ResourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceIdentity({:#x})", self.0)
    }
}

/// 把任意接口视图还原成规范对象
pub fn canonicalize(resource: &Arc<dyn NativeResource>) -> Arc<dyn NativeResource> {
    (**resource).canonical().unwrap_or_else(|| resource.clone())
}
