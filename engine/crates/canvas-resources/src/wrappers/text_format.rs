use crate::native::text::NativeTextFormat;
use canvas_interop::errors::{InteropError, InteropResult};
use canvas_interop::identity::ResourceIdentity;
use canvas_interop::identity_map::RegistryReport;
use canvas_interop::registration::Registration;
use canvas_interop::resource_registry::ResourceRegistry;
use canvas_interop::wrapper_base::WrapperBase;
use std::sync::{Arc, OnceLock};

type TextFormatRegistry = ResourceRegistry<NativeTextFormat, CanvasTextFormat>;

/// 文本格式专用的注册表
///
/// 文本格式与设备无关，也不参与跨类型互操作，只需要单类型缓存。
fn registry() -> &'static TextFormatRegistry {
    static REGISTRY: OnceLock<TextFormatRegistry> = OnceLock::new();
    REGISTRY.get_or_init(TextFormatRegistry::new)
}

/// 文本格式的包装对象
pub struct CanvasTextFormat {
    base: WrapperBase<NativeTextFormat>,
    family: String,
    size: f32,
}

// new & init
impl CanvasTextFormat {
    pub fn create(family: &str, size: f32) -> InteropResult<Arc<Self>> {
        if size.is_nan() || size <= 0.0 {
            return Err(InteropError::Construction(format!("font size must be positive, got {size}")));
        }
        registry().add(&NativeTextFormat::new(family, size), Self::new)
    }

    /// 原生文本格式对应的包装对象
    pub fn from_native(native: &Arc<NativeTextFormat>) -> InteropResult<Arc<Self>> {
        registry().get_or_create(native, Self::new)
    }

    /// 只查缓存
    pub fn lookup(native: &Arc<NativeTextFormat>) -> Option<Arc<Self>> {
        registry().lookup(native)
    }

    fn new(native: Arc<NativeTextFormat>, registration: Registration) -> InteropResult<Arc<Self>> {
        let family = native.family().to_string();
        let size = native.size();
        Ok(Arc::new(Self {
            base: WrapperBase::new(native, registration),
            family,
            size,
        }))
    }
}

// getter
impl CanvasTextFormat {
    pub fn native(&self) -> InteropResult<Arc<NativeTextFormat>> {
        self.base.resource()
    }

    #[inline]
    pub fn identity(&self) -> ResourceIdentity {
        self.base.identity()
    }

    #[inline]
    pub fn family(&self) -> &str {
        &self.family
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn is_closed(&self) -> bool {
        self.base.is_closed()
    }

    pub fn registry_report() -> RegistryReport {
        registry().report()
    }
}

// destroy
impl CanvasTextFormat {
    pub fn close(&self) {
        self.base.close();
    }
}
