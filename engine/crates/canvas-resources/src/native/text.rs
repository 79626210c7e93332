use crate::native::device::NativeDevice;
use canvas_interop::identity::NativeResource;
use std::sync::Arc;

/// 原生文本格式，与设备无关
pub struct NativeTextFormat {
    family: String,
    size: f32,
}

impl NativeResource for NativeTextFormat {}

impl NativeTextFormat {
    pub fn new(family: impl Into<String>, size: f32) -> Arc<Self> {
        Arc::new(Self {
            family: family.into(),
            size,
        })
    }

    #[inline]
    pub fn family(&self) -> &str {
        &self.family
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }
}

/// 原生文本布局
pub struct NativeTextLayout {
    device: Arc<NativeDevice>,
    text: String,
    format: Arc<NativeTextFormat>,
    max_size: glam::Vec2,
}

impl NativeResource for NativeTextLayout {}

impl NativeTextLayout {
    pub fn new(
        device: Arc<NativeDevice>,
        text: impl Into<String>,
        format: Arc<NativeTextFormat>,
        max_size: glam::Vec2,
    ) -> Arc<Self> {
        Arc::new(Self {
            device,
            text: text.into(),
            format,
            max_size,
        })
    }

    #[inline]
    pub fn device(&self) -> &Arc<NativeDevice> {
        &self.device
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn format(&self) -> &Arc<NativeTextFormat> {
        &self.format
    }

    #[inline]
    pub fn max_size(&self) -> glam::Vec2 {
        self.max_size
    }
}
