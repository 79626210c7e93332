use crate::native::geometry::{GeometryShape, NativeGeometry};
use crate::wrappers::device::CanvasDevice;
use crate::wrappers::resolve_device;
use canvas_interop::errors::{InteropError, InteropResult};
use canvas_interop::interop_registry::InteropRegistry;
use canvas_interop::probe::ProbeContext;
use canvas_interop::registration::Registration;
use canvas_interop::wrapper_base::WrapperBase;
use glam::Vec2;
use std::sync::Arc;

/// 几何体的包装对象
pub struct CanvasGeometry {
    base: WrapperBase<NativeGeometry>,
    device: Arc<CanvasDevice>,
}
impl_device_bound_wrapper!(CanvasGeometry);

// new & init
impl CanvasGeometry {
    pub fn create_rectangle(
        registry: &InteropRegistry,
        device: &Arc<CanvasDevice>,
        min: Vec2,
        max: Vec2,
    ) -> InteropResult<Arc<Self>> {
        Self::create(registry, device, GeometryShape::Rectangle { min, max })
    }

    pub fn create_ellipse(
        registry: &InteropRegistry,
        device: &Arc<CanvasDevice>,
        center: Vec2,
        radius: Vec2,
    ) -> InteropResult<Arc<Self>> {
        Self::create(registry, device, GeometryShape::Ellipse { center, radius })
    }

    /// 多边形至少需要 3 个顶点
    pub fn create_polygon(
        registry: &InteropRegistry,
        device: &Arc<CanvasDevice>,
        points: &[Vec2],
    ) -> InteropResult<Arc<Self>> {
        if points.len() < 3 {
            return Err(InteropError::Construction(format!(
                "a polygon needs at least 3 points, got {}",
                points.len()
            )));
        }
        Self::create(registry, device, GeometryShape::Polygon(points.to_vec()))
    }

    fn create(
        registry: &InteropRegistry,
        device: &Arc<CanvasDevice>,
        shape: GeometryShape,
    ) -> InteropResult<Arc<Self>> {
        let native = NativeGeometry::new(device.native()?, shape);
        registry.create(native, |native, registration| {
            Ok(Arc::new(Self {
                base: WrapperBase::new(native, registration),
                device: device.clone(),
            }))
        })
    }

    pub(crate) fn from_probe(
        native: Arc<NativeGeometry>,
        context: &ProbeContext<'_>,
        registration: Registration,
    ) -> InteropResult<Arc<Self>> {
        let device = resolve_device(context, native.device())?;
        Ok(Arc::new(Self {
            base: WrapperBase::new(native, registration),
            device,
        }))
    }
}

// getter
impl CanvasGeometry {
    pub fn native(&self) -> InteropResult<Arc<NativeGeometry>> {
        self.base.resource()
    }

    #[inline]
    pub fn device(&self) -> &Arc<CanvasDevice> {
        &self.device
    }

    /// 轴对齐包围盒，关闭后返回 [`InteropError::Closed`]
    pub fn compute_bounds(&self) -> InteropResult<(Vec2, Vec2)> {
        self.base.with_resource(NativeGeometry::bounds)
    }
}
