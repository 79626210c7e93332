use crate::native::device::NativeDevice;
use canvas_interop::identity::NativeResource;
use std::sync::Arc;

/// 原生纯色画刷
pub struct NativeSolidColorBrush {
    device: Arc<NativeDevice>,
    /// 线性空间 RGBA
    color: glam::Vec4,
}

impl NativeResource for NativeSolidColorBrush {}

impl NativeSolidColorBrush {
    pub fn new(device: Arc<NativeDevice>, color: glam::Vec4) -> Arc<Self> {
        Arc::new(Self { device, color })
    }

    #[inline]
    pub fn device(&self) -> &Arc<NativeDevice> {
        &self.device
    }

    #[inline]
    pub fn color(&self) -> glam::Vec4 {
        self.color
    }
}
