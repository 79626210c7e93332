use crate::native::brush::NativeSolidColorBrush;
use crate::wrappers::device::CanvasDevice;
use crate::wrappers::resolve_device;
use canvas_interop::errors::InteropResult;
use canvas_interop::interop_registry::InteropRegistry;
use canvas_interop::probe::ProbeContext;
use canvas_interop::registration::Registration;
use canvas_interop::wrapper_base::WrapperBase;
use std::sync::Arc;

/// 纯色画刷的包装对象
pub struct CanvasSolidColorBrush {
    base: WrapperBase<NativeSolidColorBrush>,
    device: Arc<CanvasDevice>,
    color: glam::Vec4,
}
impl_device_bound_wrapper!(CanvasSolidColorBrush);

// new & init
impl CanvasSolidColorBrush {
    pub fn create(
        registry: &InteropRegistry,
        device: &Arc<CanvasDevice>,
        color: glam::Vec4,
    ) -> InteropResult<Arc<Self>> {
        let native = NativeSolidColorBrush::new(device.native()?, color);
        registry.create(native, |native, registration| Ok(Self::new(native, device.clone(), registration)))
    }

    pub(crate) fn from_probe(
        native: Arc<NativeSolidColorBrush>,
        context: &ProbeContext<'_>,
        registration: Registration,
    ) -> InteropResult<Arc<Self>> {
        let device = resolve_device(context, native.device())?;
        Ok(Self::new(native, device, registration))
    }

    fn new(native: Arc<NativeSolidColorBrush>, device: Arc<CanvasDevice>, registration: Registration) -> Arc<Self> {
        let color = native.color();
        Arc::new(Self {
            base: WrapperBase::new(native, registration),
            device,
            color,
        })
    }
}

// getter
impl CanvasSolidColorBrush {
    pub fn native(&self) -> InteropResult<Arc<NativeSolidColorBrush>> {
        self.base.resource()
    }

    #[inline]
    pub fn device(&self) -> &Arc<CanvasDevice> {
        &self.device
    }

    #[inline]
    pub fn color(&self) -> glam::Vec4 {
        self.color
    }
}
