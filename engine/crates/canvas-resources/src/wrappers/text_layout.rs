use crate::native::text::NativeTextLayout;
use crate::wrappers::device::CanvasDevice;
use crate::wrappers::resolve_device;
use crate::wrappers::text_format::CanvasTextFormat;
use canvas_interop::errors::InteropResult;
use canvas_interop::interop_registry::InteropRegistry;
use canvas_interop::probe::ProbeContext;
use canvas_interop::registration::Registration;
use canvas_interop::wrapper_base::WrapperBase;
use std::sync::Arc;

/// 文本布局的包装对象
///
/// 布局引用的文本格式来自文本格式自己的注册表，和全局注册表互不干扰。
pub struct CanvasTextLayout {
    base: WrapperBase<NativeTextLayout>,
    device: Arc<CanvasDevice>,
    format: Arc<CanvasTextFormat>,
}
impl_device_bound_wrapper!(CanvasTextLayout);

// new & init
impl CanvasTextLayout {
    pub fn create(
        registry: &InteropRegistry,
        device: &Arc<CanvasDevice>,
        text: &str,
        format: &Arc<CanvasTextFormat>,
        max_size: glam::Vec2,
    ) -> InteropResult<Arc<Self>> {
        let native = NativeTextLayout::new(device.native()?, text, format.native()?, max_size);
        registry.create(native, |native, registration| {
            Ok(Arc::new(Self {
                base: WrapperBase::new(native, registration),
                device: device.clone(),
                format: format.clone(),
            }))
        })
    }

    pub(crate) fn from_probe(
        native: Arc<NativeTextLayout>,
        context: &ProbeContext<'_>,
        registration: Registration,
    ) -> InteropResult<Arc<Self>> {
        let device = resolve_device(context, native.device())?;
        let format = CanvasTextFormat::from_native(native.format())?;
        Ok(Arc::new(Self {
            base: WrapperBase::new(native, registration),
            device,
            format,
        }))
    }
}

// getter
impl CanvasTextLayout {
    pub fn native(&self) -> InteropResult<Arc<NativeTextLayout>> {
        self.base.resource()
    }

    #[inline]
    pub fn device(&self) -> &Arc<CanvasDevice> {
        &self.device
    }

    #[inline]
    pub fn format(&self) -> &Arc<CanvasTextFormat> {
        &self.format
    }

    pub fn text(&self) -> InteropResult<String> {
        self.base.with_resource(|layout| layout.text().to_string())
    }
}
