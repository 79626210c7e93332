use crate::native::device::NativeDevice;
use canvas_interop::identity::NativeResource;
use std::sync::Arc;

/// 原生命令列表，录制完成后可以反复回放
pub struct NativeCommandList {
    device: Arc<NativeDevice>,
}

impl NativeResource for NativeCommandList {}

impl NativeCommandList {
    pub fn new(device: Arc<NativeDevice>) -> Arc<Self> {
        Arc::new(Self { device })
    }

    #[inline]
    pub fn device(&self) -> &Arc<NativeDevice> {
        &self.device
    }
}
