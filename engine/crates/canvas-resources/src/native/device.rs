use canvas_interop::identity::NativeResource;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_DEVICE_ID: AtomicU64 = AtomicU64::new(1);

/// 原生设备
pub struct NativeDevice {
    id: u64,
    adapter_name: String,
}

impl NativeResource for NativeDevice {}

impl NativeDevice {
    pub fn new(adapter_name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            id: NEXT_DEVICE_ID.fetch_add(1, Ordering::Relaxed),
            adapter_name: adapter_name.into(),
        })
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn adapter_name(&self) -> &str {
        &self.adapter_name
    }
}
