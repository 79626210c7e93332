use crate::errors::{InteropError, InteropResult};
use crate::identity::ResourceIdentity;
use crate::registration::Registration;
use parking_lot::Mutex;
use std::sync::Arc;

enum WrapperState<N: ?Sized> {
    Live {
        resource: Arc<N>,
        registration: Registration,
    },
    Closed,
}

/// 包装对象共用的生命周期
///
/// 持有原生资源的强引用以及注册表发出的 [`Registration`]。
/// 状态只有 Live -> Closed 一个方向：
/// - 第一次 [`close`](Self::close) 注销条目并释放原生资源，之后的调用什么也不做；
/// - `Drop` 时自动关闭，因此每个包装对象恰好注销一次。
///
/// 条目由注册表在调用构造函数时登记，`WrapperBase` 只负责注销。
pub struct WrapperBase<N: ?Sized> {
    identity: ResourceIdentity,
    state: Mutex<WrapperState<N>>,
}

// new & init
impl<N: ?Sized> WrapperBase<N> {
    pub fn new(resource: Arc<N>, registration: Registration) -> Self {
        Self {
            identity: registration.identity(),
            state: Mutex::new(WrapperState::Live { resource, registration }),
        }
    }
}

// getter
impl<N: ?Sized> WrapperBase<N> {
    /// 原生资源的强引用
    pub fn resource(&self) -> InteropResult<Arc<N>> {
        match &*self.state.lock() {
            WrapperState::Live { resource, .. } => Ok(resource.clone()),
            WrapperState::Closed => Err(InteropError::Closed),
        }
    }

    /// 在不克隆 `Arc` 的情况下访问原生资源
    pub fn with_resource<R>(&self, f: impl FnOnce(&N) -> R) -> InteropResult<R> {
        match &*self.state.lock() {
            WrapperState::Live { resource, .. } => Ok(f(resource)),
            WrapperState::Closed => Err(InteropError::Closed),
        }
    }

    #[inline]
    pub fn identity(&self) -> ResourceIdentity {
        self.identity
    }

    pub fn is_closed(&self) -> bool {
        matches!(&*self.state.lock(), WrapperState::Closed)
    }
}

// destroy
impl<N: ?Sized> WrapperBase<N> {
    /// 关闭包装对象，返回本次调用是否真正执行了关闭
    pub fn close(&self) -> bool {
        // 先切换状态再通知注册表：注销期间重入的 close 只会看到 Closed
        let previous = std::mem::replace(&mut *self.state.lock(), WrapperState::Closed);
        match previous {
            WrapperState::Live { resource, registration } => {
                // 先注销再释放原生资源，释放后分配地址可能被新资源复用
                registration.unregister();
                drop(resource);
                true
            }
            WrapperState::Closed => false,
        }
    }
}

impl<N: ?Sized> Drop for WrapperBase<N> {
    fn drop(&mut self) {
        self.close();
    }
}
