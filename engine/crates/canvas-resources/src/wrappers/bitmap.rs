use crate::native::bitmap::{BitmapOptions, NativeBitmap};
use crate::wrappers::device::CanvasDevice;
use crate::wrappers::resolve_device;
use canvas_interop::errors::{InteropError, InteropResult};
use canvas_interop::identity::ResourceIdentity;
use canvas_interop::interop_registry::InteropRegistry;
use canvas_interop::probe::ProbeContext;
use canvas_interop::registration::Registration;
use canvas_interop::wrapper::{InteropWrapper, WrapperRef};
use canvas_interop::wrapper_base::WrapperBase;
use std::sync::Arc;

/// 位图与渲染目标共用的部分
struct BitmapCore {
    base: WrapperBase<NativeBitmap>,
    device: Arc<CanvasDevice>,
    size: glam::UVec2,
    dpi: f32,
}

impl BitmapCore {
    fn new(native: Arc<NativeBitmap>, device: Arc<CanvasDevice>, registration: Registration) -> Self {
        let size = native.size();
        let dpi = native.dpi();
        Self {
            base: WrapperBase::new(native, registration),
            device,
            size,
            dpi,
        }
    }

    fn native_for(
        device: &CanvasDevice,
        size: glam::UVec2,
        dpi: f32,
        options: BitmapOptions,
    ) -> InteropResult<Arc<NativeBitmap>> {
        if size.x == 0 || size.y == 0 {
            return Err(InteropError::Construction(format!("bitmap size must be non-zero, got {size}")));
        }
        if dpi.is_nan() || dpi <= 0.0 {
            return Err(InteropError::Construction(format!("bitmap dpi must be positive, got {dpi}")));
        }
        Ok(NativeBitmap::new(device.native()?, size, dpi, options))
    }
}

/// 位图的包装对象
pub struct CanvasBitmap {
    core: BitmapCore,
}

// new & init
impl CanvasBitmap {
    pub fn create(
        registry: &InteropRegistry,
        device: &Arc<CanvasDevice>,
        size: glam::UVec2,
        dpi: f32,
    ) -> InteropResult<Arc<Self>> {
        let native = BitmapCore::native_for(device, size, dpi, BitmapOptions::empty())?;
        registry.create(native, |native, registration| {
            Ok(Arc::new(Self {
                core: BitmapCore::new(native, device.clone(), registration),
            }))
        })
    }

    pub(crate) fn from_probe(
        native: Arc<NativeBitmap>,
        context: &ProbeContext<'_>,
        registration: Registration,
    ) -> InteropResult<Arc<Self>> {
        let device = resolve_device(context, native.device())?;
        Ok(Arc::new(Self {
            core: BitmapCore::new(native, device, registration),
        }))
    }
}

// getter
impl CanvasBitmap {
    pub fn native(&self) -> InteropResult<Arc<NativeBitmap>> {
        self.core.base.resource()
    }

    #[inline]
    pub fn device(&self) -> &Arc<CanvasDevice> {
        &self.core.device
    }

    #[inline]
    pub fn size(&self) -> glam::UVec2 {
        self.core.size
    }

    #[inline]
    pub fn dpi(&self) -> f32 {
        self.core.dpi
    }
}

impl InteropWrapper for CanvasBitmap {
    fn identity(&self) -> ResourceIdentity {
        self.core.base.identity()
    }

    fn bound_device(&self) -> Option<WrapperRef> {
        Some(self.core.device.clone())
    }

    fn bound_dpi(&self) -> Option<f32> {
        Some(self.core.dpi)
    }

    fn close(&self) {
        self.core.base.close();
    }

    fn is_closed(&self) -> bool {
        self.core.base.is_closed()
    }
}

/// 可作为渲染目标的位图
///
/// 原生层面仍然是位图，只是带有 [`BitmapOptions::TARGET`] 且可以被绘制。
/// 探针表里它必须排在 [`CanvasBitmap`] 之前。
pub struct CanvasRenderTarget {
    core: BitmapCore,
    options: BitmapOptions,
}

// new & init
impl CanvasRenderTarget {
    pub fn create(
        registry: &InteropRegistry,
        device: &Arc<CanvasDevice>,
        size: glam::UVec2,
        dpi: f32,
    ) -> InteropResult<Arc<Self>> {
        let native = BitmapCore::native_for(device, size, dpi, BitmapOptions::TARGET)?;
        registry.create(native, |native, registration| Ok(Self::new(native, device.clone(), registration)))
    }

    pub(crate) fn from_probe(
        native: Arc<NativeBitmap>,
        context: &ProbeContext<'_>,
        registration: Registration,
    ) -> InteropResult<Arc<Self>> {
        let device = resolve_device(context, native.device())?;
        Ok(Self::new(native, device, registration))
    }

    fn new(native: Arc<NativeBitmap>, device: Arc<CanvasDevice>, registration: Registration) -> Arc<Self> {
        let options = native.options();
        Arc::new(Self {
            core: BitmapCore::new(native, device, registration),
            options,
        })
    }
}

// getter
impl CanvasRenderTarget {
    pub fn native(&self) -> InteropResult<Arc<NativeBitmap>> {
        self.core.base.resource()
    }

    #[inline]
    pub fn device(&self) -> &Arc<CanvasDevice> {
        &self.core.device
    }

    #[inline]
    pub fn size(&self) -> glam::UVec2 {
        self.core.size
    }

    #[inline]
    pub fn dpi(&self) -> f32 {
        self.core.dpi
    }

    #[inline]
    pub fn options(&self) -> BitmapOptions {
        self.options
    }
}

impl InteropWrapper for CanvasRenderTarget {
    fn identity(&self) -> ResourceIdentity {
        self.core.base.identity()
    }

    fn bound_device(&self) -> Option<WrapperRef> {
        Some(self.core.device.clone())
    }

    fn bound_dpi(&self) -> Option<f32> {
        Some(self.core.dpi)
    }

    fn close(&self) {
        self.core.base.close();
    }

    fn is_closed(&self) -> bool {
        self.core.base.is_closed()
    }
}
