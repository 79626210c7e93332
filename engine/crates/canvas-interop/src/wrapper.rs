use crate::any_arc::ArcAny;
use crate::errors::{InteropError, InteropResult};
use crate::identity::ResourceIdentity;
use std::sync::Arc;

/// 全局注册表中的包装对象统一以此类型流转
pub type WrapperRef = Arc<dyn InteropWrapper>;

/// 可以放进 [`InteropRegistry`](crate::interop_registry::InteropRegistry) 的包装对象
///
/// 设备和 DPI 是可选的绑定元数据，只在 get-or-create 校验时使用；
/// 不携带元数据的包装对象不参与对应的校验。
pub trait InteropWrapper: ArcAny {
    /// 被包装的原生资源的身份
    fn identity(&self) -> ResourceIdentity;

    /// 包装对象所属的设备
    fn bound_device(&self) -> Option<WrapperRef> {
        None
    }

    /// 包装对象的 DPI
    fn bound_dpi(&self) -> Option<f32> {
        None
    }

    fn close(&self);

    fn is_closed(&self) -> bool;
}

/// 两个包装引用是否指向同一个对象
#[inline]
pub fn same_wrapper(a: &WrapperRef, b: &WrapperRef) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// 把 [`WrapperRef`] 还原成具体的包装类型
pub fn downcast_wrapper<T: InteropWrapper>(wrapper: WrapperRef) -> InteropResult<Arc<T>> {
    let actual = (*wrapper).type_name();
    wrapper.into_any_arc().downcast::<T>().map_err(|_| InteropError::WrongWrapperType {
        expected: std::any::type_name::<T>(),
        actual,
    })
}
