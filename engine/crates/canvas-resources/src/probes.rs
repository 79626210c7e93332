use crate::native::bitmap::NativeBitmap;
use crate::wrappers::bitmap::{CanvasBitmap, CanvasRenderTarget};
use crate::wrappers::brush::CanvasSolidColorBrush;
use crate::wrappers::command_list::CanvasCommandList;
use crate::wrappers::device::CanvasDevice;
use crate::wrappers::geometry::CanvasGeometry;
use crate::wrappers::text_layout::CanvasTextLayout;
use canvas_interop::interop_registry::InteropRegistry;
use canvas_interop::probe::Probe;

/// 默认探针表，越具体越靠前
///
/// 渲染目标是位图的细分，必须排在普通位图之前。
pub fn default_probes() -> Vec<Probe> {
    vec![
        Probe::with_predicate("render-target", NativeBitmap::is_render_target, CanvasRenderTarget::from_probe),
        Probe::new("bitmap", CanvasBitmap::from_probe),
        Probe::new("solid-color-brush", CanvasSolidColorBrush::from_probe),
        Probe::new("geometry", CanvasGeometry::from_probe),
        Probe::new("text-layout", CanvasTextLayout::from_probe),
        Probe::new("command-list", CanvasCommandList::from_probe),
        Probe::new("device", CanvasDevice::from_probe),
    ]
}

/// 把默认探针依次追加到注册表
pub fn register_default_probes(registry: &InteropRegistry) {
    for probe in default_probes() {
        registry.register_probe(probe);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_target_is_probed_before_bitmap() {
        let registry = InteropRegistry::new();
        register_default_probes(&registry);

        let names = registry.probe_names();
        let render_target = names.iter().position(|name| *name == "render-target").unwrap();
        let bitmap = names.iter().position(|name| *name == "bitmap").unwrap();
        assert!(render_target < bitmap);
        assert_eq!(names.len(), 7);
        assert_eq!(registry.report().probes, 7);
    }
}
