use crate::probes::register_default_probes;
use canvas_interop::binding::BindingPolicy;
use canvas_interop::interop_registry::InteropRegistry;
use std::sync::OnceLock;

static GLOBAL_REGISTRY: OnceLock<InteropRegistry> = OnceLock::new();

/// 带有默认探针表的注册表
pub fn registry_with_default_probes(policy: BindingPolicy) -> InteropRegistry {
    let registry = InteropRegistry::with_policy(policy);
    register_default_probes(&registry);
    registry
}

/// 进程级的全局注册表
///
/// 第一次访问时创建，使用默认的绑定校验策略和默认探针表。
/// 需要自定义策略时先调用 [`init_global_registry`]。
pub fn global_registry() -> &'static InteropRegistry {
    GLOBAL_REGISTRY.get_or_init(|| registry_with_default_probes(BindingPolicy::default()))
}

/// 用指定策略初始化全局注册表
///
/// 全局注册表已经存在时返回 `false`，已有的注册表保持不变。
pub fn init_global_registry(policy: BindingPolicy) -> bool {
    let mut initialized = false;
    GLOBAL_REGISTRY.get_or_init(|| {
        initialized = true;
        registry_with_default_probes(policy)
    });
    if !initialized {
        log::warn!("global interop registry is already initialized, policy {policy:?} ignored");
    }
    initialized
}
