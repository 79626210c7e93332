//! Canvas 资源
//!
//! 在 [`canvas_interop`] 之上提供具体的包装类型：
//! - [`native`]：原生对象模型
//! - [`wrappers`]：设备、位图、渲染目标、画刷、几何体、文本、命令列表的包装对象
//! - [`probes`]：全局注册表使用的默认探针表
//! - [`global`]：进程级注册表
//!
//! # 使用示例
//! ```ignore
//! let registry = global_registry();
//! let device = CanvasDevice::create(registry, "adapter")?;
//! let target = CanvasRenderTarget::create(registry, &device, UVec2::new(256, 256), 96.0)?;
//!
//! // 从原生对象回到同一个包装对象
//! let native: Arc<dyn NativeResource> = target.native()?;
//! let wrapper = registry.get_or_create(Some(&device.as_wrapper()), &native, 96.0)?;
//! ```

pub mod global;
pub mod native;
pub mod probes;
pub mod wrappers;
