use std::any::Any;
use std::sync::Arc;

/// 为 trait object 提供向下转型的能力
///
/// 对所有 `Sized` 类型自动实现，作为 [`NativeResource`](crate::identity::NativeResource)
/// 和 [`InteropWrapper`](crate::wrapper::InteropWrapper) 的 supertrait，
/// 这样 `Arc<dyn Trait>` 可以还原成具体类型。
///
/// 注意：`Arc<dyn Trait>` 自身也满足 blanket impl，对 `&Arc<dyn Trait>` 调用
/// `as_any` 会得到 `Arc` 本身。需要先解引用：`(**resource).as_any()`。
pub trait ArcAny: Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;
    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
    fn type_name(&self) -> &'static str;
}

impl<T: Any + Send + Sync> ArcAny for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    #[inline]
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}
