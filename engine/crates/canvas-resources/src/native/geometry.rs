use crate::native::device::NativeDevice;
use canvas_interop::identity::NativeResource;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum GeometryShape {
    Rectangle { min: glam::Vec2, max: glam::Vec2 },
    Ellipse { center: glam::Vec2, radius: glam::Vec2 },
    Polygon(Vec<glam::Vec2>),
}

/// 原生几何体
pub struct NativeGeometry {
    device: Arc<NativeDevice>,
    shape: GeometryShape,
}

impl NativeResource for NativeGeometry {}

impl NativeGeometry {
    pub fn new(device: Arc<NativeDevice>, shape: GeometryShape) -> Arc<Self> {
        Arc::new(Self { device, shape })
    }

    #[inline]
    pub fn device(&self) -> &Arc<NativeDevice> {
        &self.device
    }

    #[inline]
    pub fn shape(&self) -> &GeometryShape {
        &self.shape
    }

    /// 轴对齐包围盒 (min, max)
    pub fn bounds(&self) -> (glam::Vec2, glam::Vec2) {
        match &self.shape {
            GeometryShape::Rectangle { min, max } => (min.min(*max), min.max(*max)),
            GeometryShape::Ellipse { center, radius } => {
                let radius = radius.abs();
                (*center - radius, *center + radius)
            }
            GeometryShape::Polygon(points) => {
                let min = points.iter().copied().fold(glam::Vec2::splat(f32::INFINITY), glam::Vec2::min);
                let max = points.iter().copied().fold(glam::Vec2::splat(f32::NEG_INFINITY), glam::Vec2::max);
                (min, max)
            }
        }
    }
}
