use crate::any_arc::ArcAny;
use crate::binding::BindingPolicy;
use crate::errors::{InteropError, InteropResult};
use crate::identity::{NativeResource, ResourceIdentity, canonicalize};
use crate::identity_map::{IdentityMap, RegistryReport};
use crate::probe::{Probe, ProbeContext};
use crate::registration::{EntryKey, Registration, RegistryLink};
use crate::wrapper::{InteropWrapper, WrapperRef, downcast_wrapper};
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::cell::RefCell;
use std::sync::{Arc, Weak};

struct GlobalState {
    map: IdentityMap<dyn InteropWrapper>,
    /// 按优先级排列，越具体越靠前
    probes: Vec<Arc<Probe>>,
}

struct GlobalInner {
    /// 身份表和探针列表共用这一把锁
    state: ReentrantMutex<RefCell<GlobalState>>,
    policy: BindingPolicy,
}

impl RegistryLink for GlobalInner {
    fn unregister(&self, identity: ResourceIdentity, key: EntryKey) {
        let guard = self.state.lock();
        guard.borrow_mut().map.remove(identity, key);
    }
}

type GlobalGuard<'a> = ReentrantMutexGuard<'a, RefCell<GlobalState>>;

/// 全局互操作注册表
///
/// 一张身份表覆盖所有包装类型。缓存未命中时按注册顺序尝试探针，
/// 由第一个识别出原生子类型的探针构造包装对象。
///
/// # 加锁
/// 查找、构造、登记、注销、探针的增删都在同一把锁内完成，
/// 同一资源并发请求时只会构造一次；代价是不相关资源的构造也被串行化。
/// 锁可重入，构造函数可以通过 [`ProbeContext::registry`] 请求其它资源。
///
/// 设备与 DPI 校验在释放锁之后进行，不在上述临界区内。
/// 包装对象的绑定元数据构造后不再变化，锁外读取与锁内读取结果相同；
/// 校验失败时丢弃的强引用也因此在锁外释放。
///
/// # 使用示例
/// ```ignore
/// let registry = InteropRegistry::new();
/// registry.register_probe(Probe::new("device", |native: Arc<NativeDevice>, _, registration| {
///     Ok(Arc::new(CanvasDevice::new(native, registration)))
/// }));
/// let wrapper = registry.get_or_create(None, &native_resource, DPI_UNSPECIFIED)?;
/// ```
#[derive(Clone)]
pub struct InteropRegistry {
    inner: Arc<GlobalInner>,
}

impl Default for InteropRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// new & init
impl InteropRegistry {
    pub fn new() -> Self {
        Self::with_policy(BindingPolicy::default())
    }

    pub fn with_policy(policy: BindingPolicy) -> Self {
        Self {
            inner: Arc::new(GlobalInner {
                state: ReentrantMutex::new(RefCell::new(GlobalState {
                    map: IdentityMap::new(),
                    probes: Vec::new(),
                })),
                policy,
            }),
        }
    }
}

// probes
impl InteropRegistry {
    /// 追加探针，优先级低于已注册的探针
    pub fn register_probe(&self, probe: Probe) {
        log::debug!("register probe `{}` for {}", probe.name(), probe.native_type());
        let guard = self.inner.state.lock();
        guard.borrow_mut().probes.push(Arc::new(probe));
    }

    /// 插入到最前面，优先级高于已注册的探针
    pub fn register_probe_front(&self, probe: Probe) {
        log::debug!("register probe `{}` for {} (front)", probe.name(), probe.native_type());
        let guard = self.inner.state.lock();
        guard.borrow_mut().probes.insert(0, Arc::new(probe));
    }

    /// 按名字移除探针，返回是否找到
    pub fn unregister_probe(&self, name: &str) -> bool {
        let guard = self.inner.state.lock();
        let removed = {
            let mut state = guard.borrow_mut();
            let position = state.probes.iter().position(|probe| probe.name() == name);
            position.map(|index| state.probes.remove(index))
        };
        let found = removed.is_some();
        // 探针在借用结束后才释放
        drop(removed);

        if found {
            log::debug!("unregister probe `{name}`");
        }
        found
    }

    /// 按优先级列出探针名
    pub fn probe_names(&self) -> Vec<&'static str> {
        let guard = self.inner.state.lock();
        let names = guard.borrow().probes.iter().map(|probe| probe.name()).collect();
        names
    }
}

// tools
impl InteropRegistry {
    /// 返回原生资源的包装对象，必要时通过探针构造
    ///
    /// - `device`：期望的所属设备，`None` 表示不限定
    /// - `dpi`：期望的 DPI，[`DPI_UNSPECIFIED`](crate::binding::DPI_UNSPECIFIED) 表示不限定
    ///
    /// 缓存命中和新构造的包装对象都要通过设备与 DPI 校验；
    /// 不携带对应元数据的包装对象不参与校验。
    pub fn get_or_create(
        &self,
        device: Option<&WrapperRef>,
        resource: &Arc<dyn NativeResource>,
        dpi: f32,
    ) -> InteropResult<WrapperRef> {
        let resource = canonicalize(resource);
        let identity = ResourceIdentity::from_arc(&resource);

        let wrapper = {
            let guard = self.inner.state.lock();
            let cached = guard.borrow().map.get(identity);
            match cached {
                Some(wrapper) => wrapper,
                None => self.construct_locked(&guard, identity, device, &resource, dpi)?,
            }
        };

        // 校验失败时这里可能持有最后一个强引用，放在锁外释放
        self.inner.policy.check(&*wrapper, device, dpi)?;
        Ok(wrapper)
    }

    /// 与 [`get_or_create`](Self::get_or_create) 相同，并要求结果是 `T` 类型
    pub fn get_or_create_as<T: InteropWrapper>(
        &self,
        device: Option<&WrapperRef>,
        resource: &Arc<dyn NativeResource>,
        dpi: f32,
    ) -> InteropResult<Arc<T>> {
        downcast_wrapper(self.get_or_create(device, resource, dpi)?)
    }

    /// 为一个全新的原生资源构造并登记包装对象，不经过探针
    ///
    /// # Panics
    /// 资源已有活着的包装对象。
    pub fn create<N, W, F>(&self, resource: Arc<N>, construct: F) -> InteropResult<Arc<W>>
    where
        N: NativeResource,
        W: InteropWrapper,
        F: FnOnce(Arc<N>, Registration) -> InteropResult<Arc<W>>,
    {
        let identity = ResourceIdentity::resolve(&resource);
        let guard = self.inner.state.lock();

        let key = guard.borrow_mut().map.reserve(identity);
        let registration = Registration::new(self.inner.clone(), identity, key);
        match construct(resource, registration) {
            Ok(wrapper) => {
                let weak: Weak<W> = Arc::downgrade(&wrapper);
                guard.borrow_mut().map.commit(key, weak);
                log::trace!("{identity:?}: created {}", std::any::type_name::<W>());
                Ok(wrapper)
            }
            Err(err) => {
                guard.borrow_mut().map.cancel(key);
                Err(err)
            }
        }
    }

    /// 只查缓存，不构造也不校验
    pub fn lookup(&self, resource: &Arc<dyn NativeResource>) -> Option<WrapperRef> {
        let identity = ResourceIdentity::resolve(resource);
        let guard = self.inner.state.lock();
        let cached = guard.borrow().map.get(identity);
        cached
    }

    fn construct_locked(
        &self,
        guard: &GlobalGuard<'_>,
        identity: ResourceIdentity,
        device: Option<&WrapperRef>,
        resource: &Arc<dyn NativeResource>,
        dpi: f32,
    ) -> InteropResult<WrapperRef> {
        let probe = guard.borrow().probes.iter().find(|probe| probe.matches(&**resource)).cloned();
        let Some(probe) = probe else {
            return Err(InteropError::UnknownResourceType {
                type_name: ArcAny::type_name(&**resource),
            });
        };

        let key = guard.borrow_mut().map.reserve(identity);
        let registration = Registration::new(self.inner.clone(), identity, key);
        let context = ProbeContext {
            device,
            dpi,
            registry: self,
        };

        // 构造期间不持有 RefCell 借用，构造函数可以重入注册表
        match probe.construct(resource.clone(), &context, registration) {
            Ok(wrapper) => {
                guard.borrow_mut().map.commit(key, Arc::downgrade(&wrapper));
                log::trace!("{identity:?}: probe `{}` created {}", probe.name(), ArcAny::type_name(&*wrapper));
                Ok(wrapper)
            }
            Err(err) => {
                guard.borrow_mut().map.cancel(key);
                Err(err)
            }
        }
    }
}

// getter
impl InteropRegistry {
    #[inline]
    pub fn policy(&self) -> BindingPolicy {
        self.inner.policy
    }

    pub fn len(&self) -> usize {
        self.inner.state.lock().borrow().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn report(&self) -> RegistryReport {
        let guard = self.inner.state.lock();
        let state = guard.borrow();
        RegistryReport {
            probes: state.probes.len(),
            ..state.map.report()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::DPI_UNSPECIFIED;
    use crate::wrapper::same_wrapper;
    use crate::wrapper_base::WrapperBase;

    struct NativeDevice;
    impl NativeResource for NativeDevice {}

    struct NativeBitmap {
        device: Arc<NativeDevice>,
        dpi: f32,
        target: bool,
    }
    impl NativeResource for NativeBitmap {}

    /// 位图的另一个接口对象
    struct NativeImage {
        bitmap: Arc<NativeBitmap>,
    }
    impl NativeResource for NativeImage {
        fn canonical(&self) -> Option<Arc<dyn NativeResource>> {
            Some(self.bitmap.clone())
        }
    }

    struct NativeBrush;
    impl NativeResource for NativeBrush {}

    struct Device {
        base: WrapperBase<NativeDevice>,
    }
    impl InteropWrapper for Device {
        fn identity(&self) -> ResourceIdentity {
            self.base.identity()
        }
        fn close(&self) {
            self.base.close();
        }
        fn is_closed(&self) -> bool {
            self.base.is_closed()
        }
    }

    struct Bitmap {
        base: WrapperBase<NativeBitmap>,
        device: WrapperRef,
        dpi: f32,
        render_target: bool,
    }
    impl InteropWrapper for Bitmap {
        fn identity(&self) -> ResourceIdentity {
            self.base.identity()
        }
        fn bound_device(&self) -> Option<WrapperRef> {
            Some(self.device.clone())
        }
        fn bound_dpi(&self) -> Option<f32> {
            Some(self.dpi)
        }
        fn close(&self) {
            self.base.close();
        }
        fn is_closed(&self) -> bool {
            self.base.is_closed()
        }
    }

    fn device_probe() -> Probe {
        Probe::new("device", |native: Arc<NativeDevice>, _, registration| {
            Ok(Arc::new(Device {
                base: WrapperBase::new(native, registration),
            }))
        })
    }

    fn bitmap_probe(name: &'static str, render_target: bool) -> Probe {
        Probe::with_predicate(
            name,
            move |native: &NativeBitmap| native.target || !render_target,
            move |native: Arc<NativeBitmap>, context: &ProbeContext<'_>, registration| {
                let device = match context.device {
                    Some(device) => device.clone(),
                    // 重入同一个注册表解析所属设备
                    None => {
                        let native_device: Arc<dyn NativeResource> = native.device.clone();
                        context.registry.get_or_create(None, &native_device, DPI_UNSPECIFIED)?
                    }
                };
                let dpi = native.dpi;
                Ok(Arc::new(Bitmap {
                    base: WrapperBase::new(native, registration),
                    device,
                    dpi,
                    render_target,
                }))
            },
        )
    }

    fn registry() -> InteropRegistry {
        let registry = InteropRegistry::new();
        registry.register_probe(bitmap_probe("render-target", true));
        registry.register_probe(bitmap_probe("bitmap", false));
        registry.register_probe(device_probe());
        registry
    }

    fn bitmap(device: &Arc<NativeDevice>, dpi: f32, target: bool) -> Arc<dyn NativeResource> {
        Arc::new(NativeBitmap {
            device: device.clone(),
            dpi,
            target,
        })
    }

    fn wrap(registry: &InteropRegistry, native: &Arc<dyn NativeResource>) -> WrapperRef {
        registry.get_or_create(None, native, DPI_UNSPECIFIED).unwrap()
    }

    #[test]
    fn test_specific_probe_wins_when_predicate_holds() {
        let registry = registry();
        let native_device = Arc::new(NativeDevice);

        let target = registry.get_or_create_as::<Bitmap>(None, &bitmap(&native_device, 96.0, true), 0.0).unwrap();
        let plain = registry.get_or_create_as::<Bitmap>(None, &bitmap(&native_device, 96.0, false), 0.0).unwrap();

        assert!(target.render_target);
        assert!(!plain.render_target);
        // 两个位图都通过重入解析到了同一个设备包装对象
        assert!(same_wrapper(&target.device, &plain.device));
    }

    #[test]
    fn test_probe_order_is_registration_order() {
        let registry = InteropRegistry::new();
        registry.register_probe(bitmap_probe("bitmap", false));
        registry.register_probe(bitmap_probe("render-target", true));
        registry.register_probe(device_probe());
        assert_eq!(registry.probe_names(), vec!["bitmap", "render-target", "device"]);

        let native_device = Arc::new(NativeDevice);
        let wrapper = registry.get_or_create_as::<Bitmap>(None, &bitmap(&native_device, 96.0, true), 0.0).unwrap();
        assert!(!wrapper.render_target);
        drop(wrapper);

        registry.register_probe_front(bitmap_probe("render-target-first", true));
        let wrapper = registry.get_or_create_as::<Bitmap>(None, &bitmap(&native_device, 96.0, true), 0.0).unwrap();
        assert!(wrapper.render_target);
    }

    #[test]
    fn test_unknown_type_leaves_map_unmodified() {
        let registry = registry();
        let native_device: Arc<dyn NativeResource> = Arc::new(NativeDevice);
        let _device = wrap(&registry, &native_device);
        let before = registry.report();

        let brush: Arc<dyn NativeResource> = Arc::new(NativeBrush);
        let err = registry.get_or_create(None, &brush, DPI_UNSPECIFIED).err().unwrap();
        assert!(matches!(err, InteropError::UnknownResourceType { type_name } if type_name.ends_with("NativeBrush")));
        assert_eq!(registry.report(), before);
    }

    #[test]
    fn test_device_validation() {
        let registry = registry();
        let native_a: Arc<dyn NativeResource> = Arc::new(NativeDevice);
        let native_b: Arc<dyn NativeResource> = Arc::new(NativeDevice);
        let device_a = wrap(&registry, &native_a);
        let device_b = wrap(&registry, &native_b);

        let native_bitmap = bitmap(&Arc::new(NativeDevice), 96.0, false);
        let first = registry.get_or_create(Some(&device_a), &native_bitmap, 96.0).unwrap();

        assert_eq!(
            registry.get_or_create(Some(&device_b), &native_bitmap, 96.0).err(),
            Some(InteropError::DeviceMismatch)
        );
        let again = registry.get_or_create(Some(&device_a), &native_bitmap, 96.0).unwrap();
        assert!(same_wrapper(&first, &again));

        // 不限定设备时总是接受
        let unbound = registry.get_or_create(None, &native_bitmap, 96.0).unwrap();
        assert!(same_wrapper(&first, &unbound));

        // 设备自身不携带设备元数据，不参与校验
        let device_again = registry.get_or_create(Some(&device_b), &native_a, 96.0).unwrap();
        assert!(same_wrapper(&device_again, &device_a));
    }

    #[test]
    fn test_dpi_validation() {
        let registry = registry();
        let native_device = Arc::new(NativeDevice);
        let native_bitmap = bitmap(&native_device, 144.0, false);
        let wrapper = wrap(&registry, &native_bitmap);

        assert_eq!(
            registry.get_or_create(None, &native_bitmap, 96.0).err(),
            Some(InteropError::DpiMismatch {
                expected: 96.0,
                actual: 144.0
            })
        );
        // 非有限值的 DPI 不可能与任何位图一致
        for dpi in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            assert!(matches!(
                registry.get_or_create(None, &native_bitmap, dpi),
                Err(InteropError::DpiMismatch { actual, .. }) if actual == 144.0
            ));
        }
        let same = registry.get_or_create(None, &native_bitmap, 144.0).unwrap();
        assert!(same_wrapper(&same, &wrapper));
    }

    #[test]
    fn test_dpi_tolerance() {
        let registry = InteropRegistry::with_policy(BindingPolicy {
            validate_device: true,
            dpi_tolerance: 0.5,
        });
        registry.register_probe(bitmap_probe("bitmap", false));
        registry.register_probe(device_probe());

        let native_bitmap = bitmap(&Arc::new(NativeDevice), 96.25, false);
        let _wrapper = wrap(&registry, &native_bitmap);
        assert!(registry.get_or_create(None, &native_bitmap, 96.0).is_ok());
        assert!(registry.get_or_create(None, &native_bitmap, 97.0).is_err());
    }

    #[test]
    fn test_interface_view_shares_entry() {
        let registry = registry();
        let native_bitmap = Arc::new(NativeBitmap {
            device: Arc::new(NativeDevice),
            dpi: 96.0,
            target: false,
        });
        let as_bitmap: Arc<dyn NativeResource> = native_bitmap.clone();
        let as_image: Arc<dyn NativeResource> = Arc::new(NativeImage { bitmap: native_bitmap });

        let via_image = wrap(&registry, &as_image);
        let via_bitmap = wrap(&registry, &as_bitmap);
        assert!(same_wrapper(&via_image, &via_bitmap));
    }

    #[test]
    fn test_weak_entry_does_not_keep_wrapper_alive() {
        let registry = registry();
        let native_device: Arc<dyn NativeResource> = Arc::new(NativeDevice);

        let device = wrap(&registry, &native_device);
        let weak = Arc::downgrade(&device);
        drop(device);

        assert!(weak.upgrade().is_none());
        assert!(registry.lookup(&native_device).is_none());
        assert_eq!(registry.report().entries, 0);

        let fresh = wrap(&registry, &native_device);
        assert!(!fresh.is_closed());
    }

    #[test]
    fn test_wrong_wrapper_type() {
        let registry = registry();
        let native_device: Arc<dyn NativeResource> = Arc::new(NativeDevice);
        let _device = wrap(&registry, &native_device);

        let err = registry.get_or_create_as::<Bitmap>(None, &native_device, 0.0).err().unwrap();
        assert!(matches!(err, InteropError::WrongWrapperType { .. }));
        // 缓存的设备不受影响
        assert!(registry.lookup(&native_device).is_some());
    }

    #[test]
    fn test_unregister_probe() {
        let registry = registry();
        assert!(registry.unregister_probe("device"));
        assert!(!registry.unregister_probe("device"));

        let native_device: Arc<dyn NativeResource> = Arc::new(NativeDevice);
        assert!(matches!(
            registry.get_or_create(None, &native_device, 0.0),
            Err(InteropError::UnknownResourceType { .. })
        ));
        assert_eq!(registry.report().probes, 2);
    }

    #[test]
    fn test_create_registers_wrapper() {
        let registry = registry();
        let native_device = Arc::new(NativeDevice);
        let created = registry
            .create(native_device.clone(), |native, registration| {
                Ok(Arc::new(Device {
                    base: WrapperBase::new(native, registration),
                }))
            })
            .unwrap();

        let as_dyn: Arc<dyn NativeResource> = native_device;
        let found = registry.get_or_create_as::<Device>(None, &as_dyn, 0.0).unwrap();
        assert!(Arc::ptr_eq(&created, &found));

        created.close();
        assert!(registry.is_empty());
        assert!(found.is_closed());
    }

    #[test]
    #[should_panic(expected = "already has a live wrapper")]
    fn test_create_over_live_wrapper_is_fatal() {
        let registry = registry();
        let native_device = Arc::new(NativeDevice);
        let as_dyn: Arc<dyn NativeResource> = native_device.clone();
        let _existing = wrap(&registry, &as_dyn);

        let _ = registry.create(native_device, |native, registration| {
            Ok(Arc::new(Device {
                base: WrapperBase::new(native, registration),
            }))
        });
    }
}
