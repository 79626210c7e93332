use crate::native::device::NativeDevice;
use canvas_interop::identity::NativeResource;
use std::sync::Arc;

bitflags::bitflags! {
    /// 位图的创建选项
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BitmapOptions: u32 {
        /// 可以作为渲染目标
        const TARGET = 1 << 0;
        /// 不能被绘制，和 TARGET 同时出现时也不算渲染目标
        const CANNOT_DRAW = 1 << 1;
        /// CPU 可读
        const CPU_READ = 1 << 2;
    }
}

/// 原生位图
pub struct NativeBitmap {
    device: Arc<NativeDevice>,
    size: glam::UVec2,
    dpi: f32,
    options: BitmapOptions,
}

impl NativeResource for NativeBitmap {}

impl NativeBitmap {
    pub fn new(device: Arc<NativeDevice>, size: glam::UVec2, dpi: f32, options: BitmapOptions) -> Arc<Self> {
        Arc::new(Self {
            device,
            size,
            dpi,
            options,
        })
    }

    #[inline]
    pub fn device(&self) -> &Arc<NativeDevice> {
        &self.device
    }

    /// 像素尺寸
    #[inline]
    pub fn size(&self) -> glam::UVec2 {
        self.size
    }

    #[inline]
    pub fn dpi(&self) -> f32 {
        self.dpi
    }

    #[inline]
    pub fn options(&self) -> BitmapOptions {
        self.options
    }

    /// 以 DIP 为单位的尺寸
    pub fn size_in_dips(&self) -> glam::Vec2 {
        self.size.as_vec2() * (96.0 / self.dpi)
    }

    pub fn is_render_target(&self) -> bool {
        self.options.contains(BitmapOptions::TARGET) && !self.options.contains(BitmapOptions::CANNOT_DRAW)
    }

    /// 位图的 image 接口
    ///
    /// 每次调用返回一个新的接口对象，它们都指向同一个位图。
    pub fn image(self: &Arc<Self>) -> Arc<NativeImage> {
        Arc::new(NativeImage { bitmap: self.clone() })
    }
}

/// 位图的 image 接口对象
pub struct NativeImage {
    bitmap: Arc<NativeBitmap>,
}

impl NativeResource for NativeImage {
    fn canonical(&self) -> Option<Arc<dyn NativeResource>> {
        Some(self.bitmap.clone())
    }
}

impl NativeImage {
    #[inline]
    pub fn bitmap(&self) -> &Arc<NativeBitmap> {
        &self.bitmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_interop::identity::ResourceIdentity;

    #[test]
    fn test_render_target_refinement() {
        let device = NativeDevice::new("test");
        let size = glam::UVec2::new(4, 4);

        assert!(NativeBitmap::new(device.clone(), size, 96.0, BitmapOptions::TARGET).is_render_target());
        assert!(!NativeBitmap::new(device.clone(), size, 96.0, BitmapOptions::CPU_READ).is_render_target());
        assert!(
            !NativeBitmap::new(device, size, 96.0, BitmapOptions::TARGET | BitmapOptions::CANNOT_DRAW)
                .is_render_target()
        );
    }

    #[test]
    fn test_image_views_share_identity() {
        let device = NativeDevice::new("test");
        let bitmap = NativeBitmap::new(device, glam::UVec2::new(8, 8), 192.0, BitmapOptions::empty());
        let a = bitmap.image();
        let b = bitmap.image();

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(ResourceIdentity::resolve(&a), ResourceIdentity::resolve(&b));
        assert_eq!(ResourceIdentity::resolve(&a), ResourceIdentity::resolve(&bitmap));
        assert_eq!(bitmap.size_in_dips(), glam::Vec2::new(4.0, 4.0));
    }
}
