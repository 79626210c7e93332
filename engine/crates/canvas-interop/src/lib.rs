//! 原生资源身份缓存
//!
//! 保证一个原生资源在任意时刻最多只有一个活着的包装对象，并且缓存本身从不延长包装对象的生命周期。
//!
//! - [`identity`]：原生资源的规范身份
//! - [`wrapper_base`]：包装对象共用的生命周期（持有原生句柄、关闭时注销）
//! - [`resource_registry`]：只服务于一种包装类型的注册表
//! - [`interop_registry`]：跨类型的全局注册表，通过有序探针列表决定构造哪种包装对象
//!
//! 两种注册表共用同一份身份表实现，区别只在于如何选择构造函数。

pub mod any_arc;
pub mod binding;
pub mod errors;
pub mod identity;
pub mod identity_map;
pub mod interop_registry;
pub mod probe;
pub mod registration;
pub mod resource_registry;
pub mod wrapper;
pub mod wrapper_base;
