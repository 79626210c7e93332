use canvas_crate_tools::config::InteropConfig;
use canvas_crate_tools::init_log::init_log;
use canvas_crate_tools::resource::CanvasPath;
use canvas_interop::identity::NativeResource;
use canvas_interop::interop_registry::InteropRegistry;
use canvas_interop::wrapper::{InteropWrapper, WrapperRef, same_wrapper};
use canvas_resources::global::registry_with_default_probes;
use canvas_resources::wrappers::bitmap::{CanvasBitmap, CanvasRenderTarget};
use canvas_resources::wrappers::brush::CanvasSolidColorBrush;
use canvas_resources::wrappers::command_list::CanvasCommandList;
use canvas_resources::wrappers::device::CanvasDevice;
use canvas_resources::wrappers::geometry::CanvasGeometry;
use canvas_resources::wrappers::text_format::CanvasTextFormat;
use canvas_resources::wrappers::text_layout::CanvasTextLayout;
use glam::{UVec2, Vec2, Vec4};
use std::sync::Arc;

fn log_report(registry: &InteropRegistry, stage: &str) {
    let report = registry.report();
    log::info!(
        "[{stage}] entries: {}, live: {}, retired: {}, pending: {}, probes: {}",
        report.entries,
        report.live,
        report.retired,
        report.pending,
        report.probes
    );
}

fn main() -> anyhow::Result<()> {
    let config = InteropConfig::load_or_default(CanvasPath::config_path("interop.toml"))?;
    init_log(config.log_level());
    log::info!("config: {config:?}");

    let registry = registry_with_default_probes(config.binding_policy());
    log::info!("probes: {:?}", registry.probe_names());
    log_report(&registry, "empty");

    let device = CanvasDevice::create(&registry, "Reference Adapter")?;
    let other_device = CanvasDevice::create(&registry, "Secondary Adapter")?;
    let dpi = config.default_dpi;

    let target = CanvasRenderTarget::create(&registry, &device, UVec2::new(256, 256), dpi)?;
    let bitmap = CanvasBitmap::create(&registry, &device, UVec2::new(64, 32), dpi)?;
    let brush = CanvasSolidColorBrush::create(&registry, &device, Vec4::new(1.0, 0.5, 0.0, 1.0))?;
    let geometry = CanvasGeometry::create_ellipse(&registry, &device, Vec2::new(32.0, 32.0), Vec2::new(16.0, 8.0))?;
    let format = CanvasTextFormat::create("Segoe UI", 14.0)?;
    let layout = CanvasTextLayout::create(&registry, &device, "interop", &format, Vec2::new(200.0, 40.0))?;
    let commands = CanvasCommandList::create(&registry, &device)?;
    log_report(&registry, "created");

    // 原生对象回到包装对象
    let device_ref = device.as_wrapper();
    let native_target: Arc<dyn NativeResource> = target.native()?;
    let round_trip = registry.get_or_create(Some(&device_ref), &native_target, dpi)?;
    let target_ref: WrapperRef = target.clone();
    log::info!("render target round trip: same wrapper = {}", same_wrapper(&round_trip, &target_ref));

    let image: Arc<dyn NativeResource> = bitmap.native()?.image();
    let via_image = registry.get_or_create_as::<CanvasBitmap>(None, &image, dpi)?;
    log::info!("bitmap via image interface: same wrapper = {}", Arc::ptr_eq(&via_image, &bitmap));

    // 绑定元数据不一致
    if let Err(err) = registry.get_or_create(Some(&other_device.as_wrapper()), &native_target, dpi) {
        log::info!("other device: {err}");
    }
    if let Err(err) = registry.get_or_create(None, &native_target, dpi * 2.0) {
        log::info!("double dpi: {err}");
    }

    log::info!("geometry bounds: {:?}", geometry.compute_bounds()?);
    log::info!("layout `{}` uses {} {}pt", layout.text()?, layout.format().family(), layout.format().size());
    log::info!("brush color: {}", brush.color());

    commands.close();
    log_report(&registry, "command list closed");

    drop((round_trip, target_ref, via_image, target, bitmap, brush, geometry, layout, commands));
    log_report(&registry, "wrappers released");

    Ok(())
}
