use anyhow::Context;
use canvas_interop::binding::BindingPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 身份缓存相关的配置，对应 `config/interop.toml`
///
/// 所有字段都有默认值，配置文件里只需要写需要覆盖的项。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteropConfig {
    /// 日志级别：off / error / warn / info / debug / trace
    pub log_level: String,

    /// 创建位图时使用的默认 DPI
    pub default_dpi: f32,

    /// DPI 校验的绝对容差，0 表示必须严格相等
    pub dpi_tolerance: f32,

    /// 是否校验包装对象绑定的设备
    pub validate_device: bool,
}

impl Default for InteropConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            default_dpi: 96.0,
            dpi_tolerance: 0.0,
            validate_device: true,
        }
    }
}

impl InteropConfig {
    /// 从 TOML 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).with_context(|| format!("读取配置文件失败: {:?}", path.as_ref()))?;

        Self::from_toml_str(&content).with_context(|| format!("解析 TOML 配置失败: {:?}", path.as_ref()))
    }

    /// 从 TOML 文本解析配置
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: InteropConfig = toml::from_str(content)?;
        anyhow::ensure!(config.default_dpi > 0.0, "default_dpi 必须为正数: {}", config.default_dpi);
        anyhow::ensure!(config.dpi_tolerance >= 0.0, "dpi_tolerance 不能为负数: {}", config.dpi_tolerance);
        Ok(config)
    }

    /// 文件存在时加载，否则使用默认配置
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    #[inline]
    pub fn log_level(&self) -> log::LevelFilter {
        crate::init_log::parse_level(&self.log_level)
    }

    /// 转换为注册表使用的绑定校验策略
    pub fn binding_policy(&self) -> BindingPolicy {
        BindingPolicy {
            validate_device: self.validate_device,
            dpi_tolerance: self.dpi_tolerance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = InteropConfig::from_toml_str("log_level = \"debug\"\n").unwrap();
        assert_eq!(config.log_level(), log::LevelFilter::Debug);
        assert_eq!(config.default_dpi, 96.0);
        assert_eq!(config.dpi_tolerance, 0.0);
        assert!(config.validate_device);
    }

    #[test]
    fn test_binding_policy() {
        let config = InteropConfig::from_toml_str("dpi_tolerance = 0.5\nvalidate_device = false\n").unwrap();
        let policy = config.binding_policy();
        assert!(!policy.validate_device);
        assert_eq!(policy.dpi_tolerance, 0.5);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(InteropConfig::from_toml_str("default_dpi = 0.0\n").is_err());
        assert!(InteropConfig::from_toml_str("dpi_tolerance = -1.0\n").is_err());
        assert!(InteropConfig::from_toml_str("default_dpi = \"wide\"\n").is_err());
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let config = InteropConfig::load_or_default("/definitely/not/here/interop.toml").unwrap();
        assert_eq!(config, InteropConfig::default());
    }
}
