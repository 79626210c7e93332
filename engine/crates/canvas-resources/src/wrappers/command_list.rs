use crate::native::command_list::NativeCommandList;
use crate::wrappers::device::CanvasDevice;
use crate::wrappers::resolve_device;
use canvas_interop::errors::InteropResult;
use canvas_interop::interop_registry::InteropRegistry;
use canvas_interop::probe::ProbeContext;
use canvas_interop::registration::Registration;
use canvas_interop::wrapper_base::WrapperBase;
use std::sync::Arc;

pub struct CanvasCommandList {
    base: WrapperBase<NativeCommandList>,
    device: Arc<CanvasDevice>,
}
impl_device_bound_wrapper!(CanvasCommandList);

impl CanvasCommandList {
    pub fn create(registry: &InteropRegistry, device: &Arc<CanvasDevice>) -> InteropResult<Arc<Self>> {
        let native = NativeCommandList::new(device.native()?);
        registry.create(native, |native, registration| {
            Ok(Arc::new(Self {
                base: WrapperBase::new(native, registration),
                device: device.clone(),
            }))
        })
    }

    pub(crate) fn from_probe(
        native: Arc<NativeCommandList>,
        context: &ProbeContext<'_>,
        registration: Registration,
    ) -> InteropResult<Arc<Self>> {
        let device = resolve_device(context, native.device())?;
        Ok(Arc::new(Self {
            base: WrapperBase::new(native, registration),
            device,
        }))
    }

    pub fn native(&self) -> InteropResult<Arc<NativeCommandList>> {
        self.base.resource()
    }

    #[inline]
    pub fn device(&self) -> &Arc<CanvasDevice> {
        &self.device
    }
}
