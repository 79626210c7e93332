use crate::native::device::NativeDevice;
use canvas_interop::errors::InteropResult;
use canvas_interop::identity::ResourceIdentity;
use canvas_interop::interop_registry::InteropRegistry;
use canvas_interop::probe::ProbeContext;
use canvas_interop::registration::Registration;
use canvas_interop::wrapper::{InteropWrapper, WrapperRef};
use canvas_interop::wrapper_base::WrapperBase;
use std::sync::Arc;

/// 设备的包装对象
///
/// 其它包装对象通过 [`InteropWrapper::bound_device`] 指向它，设备校验比较的就是这个对象的地址。
pub struct CanvasDevice {
    base: WrapperBase<NativeDevice>,
    adapter_name: String,
}

// new & init
impl CanvasDevice {
    /// 创建一个新设备并登记
    pub fn create(registry: &InteropRegistry, adapter_name: &str) -> InteropResult<Arc<Self>> {
        let device = registry.create(NativeDevice::new(adapter_name), Self::new)?;
        log::debug!("created device #{} on `{adapter_name}`", device.native()?.id());
        Ok(device)
    }

    pub(crate) fn from_probe(
        native: Arc<NativeDevice>,
        _context: &ProbeContext<'_>,
        registration: Registration,
    ) -> InteropResult<Arc<Self>> {
        Self::new(native, registration)
    }

    fn new(native: Arc<NativeDevice>, registration: Registration) -> InteropResult<Arc<Self>> {
        let adapter_name = native.adapter_name().to_string();
        Ok(Arc::new(Self {
            base: WrapperBase::new(native, registration),
            adapter_name,
        }))
    }
}

// getter
impl CanvasDevice {
    pub fn native(&self) -> InteropResult<Arc<NativeDevice>> {
        self.base.resource()
    }

    #[inline]
    pub fn adapter_name(&self) -> &str {
        &self.adapter_name
    }

    /// 作为 [`WrapperRef`] 传给注册表的设备参数
    pub fn as_wrapper(self: &Arc<Self>) -> WrapperRef {
        self.clone()
    }
}

impl InteropWrapper for CanvasDevice {
    fn identity(&self) -> ResourceIdentity {
        self.base.identity()
    }

    fn close(&self) {
        self.base.close();
    }

    fn is_closed(&self) -> bool {
        self.base.is_closed()
    }
}
