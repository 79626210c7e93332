//! Canvas 工具集
//!
//! 提供日志初始化、配置加载、工作区路径管理等通用工具。
//!
//! # InteropConfig
//! 通过 TOML 文件配置日志级别和身份缓存的绑定校验策略。

pub mod config;
pub mod init_log;
pub mod resource;
