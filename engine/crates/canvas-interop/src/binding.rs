use crate::errors::{InteropError, InteropResult};
use crate::wrapper::{InteropWrapper, WrapperRef, same_wrapper};

/// 请求方 DPI 为 0 表示不关心 DPI
pub const DPI_UNSPECIFIED: f32 = 0.0;

/// 绑定元数据的校验策略
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BindingPolicy {
    /// 是否校验设备
    pub validate_device: bool,
    /// DPI 的绝对容差，0 表示严格相等
    pub dpi_tolerance: f32,
}

impl Default for BindingPolicy {
    fn default() -> Self {
        Self {
            validate_device: true,
            dpi_tolerance: 0.0,
        }
    }
}

impl BindingPolicy {
    /// 校验包装对象是否满足请求方给出的设备与 DPI
    ///
    /// 只有请求方给出了期望值、并且包装对象携带对应元数据时才比较。
    /// 请求的 DPI 不是有限值（NaN、无穷）时视为不一致。
    pub fn check(&self, wrapper: &dyn InteropWrapper, device: Option<&WrapperRef>, dpi: f32) -> InteropResult<()> {
        if self.validate_device {
            if let (Some(expected), Some(bound)) = (device, wrapper.bound_device()) {
                if !same_wrapper(expected, &bound) {
                    return Err(InteropError::DeviceMismatch);
                }
            }
        }

        if dpi != DPI_UNSPECIFIED {
            if let Some(actual) = wrapper.bound_dpi() {
                if !dpi.is_finite() || (actual - dpi).abs() > self.dpi_tolerance {
                    return Err(InteropError::DpiMismatch { expected: dpi, actual });
                }
            }
        }

        Ok(())
    }
}
