//! 具体的包装类型
//!
//! 除 [`CanvasTextFormat`](text_format::CanvasTextFormat) 外都登记在
//! [`InteropRegistry`](canvas_interop::interop_registry::InteropRegistry) 中，
//! 并且都绑定到一个 [`CanvasDevice`](device::CanvasDevice)。

/// 为持有 `base: WrapperBase<_>` 与 `device: Arc<CanvasDevice>` 的包装类型实现 InteropWrapper
macro_rules! impl_device_bound_wrapper {
    ($name:ident) => {
        impl canvas_interop::wrapper::InteropWrapper for $name {
            fn identity(&self) -> canvas_interop::identity::ResourceIdentity {
                self.base.identity()
            }

            fn bound_device(&self) -> Option<canvas_interop::wrapper::WrapperRef> {
                Some(self.device.clone())
            }

            fn close(&self) {
                self.base.close();
            }

            fn is_closed(&self) -> bool {
                self.base.is_closed()
            }
        }
    };
}

pub mod bitmap;
pub mod brush;
pub mod command_list;
pub mod device;
pub mod geometry;
pub mod text_format;
pub mod text_layout;

use crate::native::device::NativeDevice;
use crate::wrappers::device::CanvasDevice;
use canvas_interop::binding::DPI_UNSPECIFIED;
use canvas_interop::errors::{InteropError, InteropResult};
use canvas_interop::identity::{NativeResource, ResourceIdentity};
use canvas_interop::probe::ProbeContext;
use canvas_interop::wrapper::{InteropWrapper, same_wrapper};
use std::sync::Arc;

/// 为探针构造的包装对象确定所属设备
///
/// 设备总是取自同一个注册表中原生设备的包装对象（必要时重入构造）。
/// 调用方给出了设备时，它必须就是这个包装对象，否则返回 [`InteropError::DeviceMismatch`]，
/// 已关闭的设备和不是设备的包装对象也按不一致处理。
pub(crate) fn resolve_device(
    context: &ProbeContext<'_>,
    native_device: &Arc<NativeDevice>,
) -> InteropResult<Arc<CanvasDevice>> {
    if let Some(requested) = context.device {
        // 先排除明显不一致的设备，避免为此构造设备包装对象
        if requested.is_closed() || requested.identity() != ResourceIdentity::from_arc(native_device) {
            return Err(InteropError::DeviceMismatch);
        }
    }

    let native_device: Arc<dyn NativeResource> = native_device.clone();
    let device = context.registry.get_or_create_as::<CanvasDevice>(None, &native_device, DPI_UNSPECIFIED)?;
    match context.device {
        Some(requested) if !same_wrapper(requested, &device.as_wrapper()) => Err(InteropError::DeviceMismatch),
        _ => Ok(device),
    }
}
