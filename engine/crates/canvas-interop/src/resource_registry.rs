use crate::errors::InteropResult;
use crate::identity::{NativeResource, ResourceIdentity};
use crate::identity_map::{IdentityMap, RegistryReport};
use crate::registration::{EntryKey, Registration, RegistryLink};
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::cell::RefCell;
use std::marker::PhantomData;
use std::sync::Arc;

type TypedState<W> = ReentrantMutex<RefCell<IdentityMap<W>>>;

struct TypedInner<W: ?Sized> {
    state: TypedState<W>,
}

impl<W: ?Sized + Send + Sync + 'static> RegistryLink for TypedInner<W> {
    fn unregister(&self, identity: ResourceIdentity, key: EntryKey) {
        let guard = self.state.lock();
        guard.borrow_mut().remove(identity, key);
    }
}

/// 单类型注册表
///
/// 原生类型 `N` 到包装类型 `W` 的身份缓存，构造函数由调用方在每次请求时给出。
/// 用于不参与跨类型互操作的包装类型；需要按原生类型自动选择包装类型时使用
/// [`InteropRegistry`](crate::interop_registry::InteropRegistry)。
///
/// 所有操作在注册表锁内完成，包括构造函数的调用。锁可重入：
/// 构造函数可以回调同一个注册表去请求其它资源。
pub struct ResourceRegistry<N: ?Sized, W: ?Sized> {
    inner: Arc<TypedInner<W>>,
    _native: PhantomData<fn(&N)>,
}

impl<N: ?Sized, W: ?Sized> Clone for ResourceRegistry<N, W> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _native: PhantomData,
        }
    }
}

impl<N, W> Default for ResourceRegistry<N, W>
where
    N: NativeResource + ?Sized,
    W: ?Sized + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

// new & init
impl<N, W> ResourceRegistry<N, W>
where
    N: NativeResource + ?Sized,
    W: ?Sized + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            inner: Arc::new(TypedInner {
                state: ReentrantMutex::new(RefCell::new(IdentityMap::new())),
            }),
            _native: PhantomData,
        }
    }
}

// tools
impl<N, W> ResourceRegistry<N, W>
where
    N: NativeResource + ?Sized,
    W: ?Sized + Send + Sync + 'static,
{
    /// 返回资源已有的包装对象，没有时用 `construct` 构造并登记
    pub fn get_or_create<F>(&self, resource: &Arc<N>, construct: F) -> InteropResult<Arc<W>>
    where
        F: FnOnce(Arc<N>, Registration) -> InteropResult<Arc<W>>,
    {
        let identity = ResourceIdentity::resolve(resource);
        let guard = self.inner.state.lock();

        let cached = guard.borrow().get(identity);
        if let Some(wrapper) = cached {
            return Ok(wrapper);
        }
        self.construct_locked(&guard, identity, resource, construct)
    }

    /// 为一个全新的资源构造并登记包装对象
    ///
    /// # Panics
    /// 资源已有活着的包装对象。调用方绕过了缓存，"一个资源一个包装对象"已被破坏。
    pub fn add<F>(&self, resource: &Arc<N>, construct: F) -> InteropResult<Arc<W>>
    where
        F: FnOnce(Arc<N>, Registration) -> InteropResult<Arc<W>>,
    {
        let identity = ResourceIdentity::resolve(resource);
        let guard = self.inner.state.lock();
        self.construct_locked(&guard, identity, resource, construct)
    }

    /// 只查缓存，不构造
    pub fn lookup(&self, resource: &Arc<N>) -> Option<Arc<W>> {
        let identity = ResourceIdentity::resolve(resource);
        let guard = self.inner.state.lock();
        let cached = guard.borrow().get(identity);
        cached
    }

    fn construct_locked<F>(
        &self,
        guard: &ReentrantMutexGuard<'_, RefCell<IdentityMap<W>>>,
        identity: ResourceIdentity,
        resource: &Arc<N>,
        construct: F,
    ) -> InteropResult<Arc<W>>
    where
        F: FnOnce(Arc<N>, Registration) -> InteropResult<Arc<W>>,
    {
        let key = guard.borrow_mut().reserve(identity);
        let registration = Registration::new(self.inner.clone(), identity, key);

        // 构造期间不持有 RefCell 借用，构造函数可以重入注册表
        match construct(resource.clone(), registration) {
            Ok(wrapper) => {
                guard.borrow_mut().commit(key, Arc::downgrade(&wrapper));
                log::trace!("{identity:?}: created {}", std::any::type_name::<W>());
                Ok(wrapper)
            }
            Err(err) => {
                guard.borrow_mut().cancel(key);
                Err(err)
            }
        }
    }
}

// getter
impl<N, W> ResourceRegistry<N, W>
where
    N: NativeResource + ?Sized,
    W: ?Sized + Send + Sync + 'static,
{
    pub fn len(&self) -> usize {
        self.inner.state.lock().borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn report(&self) -> RegistryReport {
        self.inner.state.lock().borrow().report()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::InteropError;
    use crate::wrapper_base::WrapperBase;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NativeFormat {
        family: String,
    }
    impl NativeResource for NativeFormat {}

    struct Format {
        base: WrapperBase<NativeFormat>,
        serial: usize,
    }

    struct Fixture {
        registry: ResourceRegistry<NativeFormat, Format>,
        constructed: AtomicUsize,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                registry: ResourceRegistry::new(),
                constructed: AtomicUsize::new(0),
            }
        }

        fn get(&self, native: &Arc<NativeFormat>) -> Arc<Format> {
            self.registry
                .get_or_create(native, |native, registration| {
                    let serial = self.constructed.fetch_add(1, Ordering::SeqCst);
                    Ok(Arc::new(Format {
                        base: WrapperBase::new(native, registration),
                        serial,
                    }))
                })
                .unwrap()
        }
    }

    fn native(family: &str) -> Arc<NativeFormat> {
        Arc::new(NativeFormat {
            family: family.to_string(),
        })
    }

    #[test]
    fn test_get_or_create_returns_same_wrapper() {
        let fixture = Fixture::new();
        let segoe = native("Segoe UI");

        let a = fixture.get(&segoe);
        let b = fixture.get(&segoe);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(fixture.constructed.load(Ordering::SeqCst), 1);
        assert_eq!(a.base.resource().unwrap().family, "Segoe UI");
        assert!(Arc::ptr_eq(&fixture.registry.lookup(&segoe).unwrap(), &a));
    }

    #[test]
    fn test_registry_does_not_retain_wrapper() {
        let fixture = Fixture::new();
        let consolas = native("Consolas");

        let first = fixture.get(&consolas);
        let first_serial = first.serial;
        drop(first);

        assert!(fixture.registry.is_empty());
        assert!(fixture.registry.lookup(&consolas).is_none());

        let second = fixture.get(&consolas);
        assert_ne!(second.serial, first_serial);
        assert_eq!(fixture.constructed.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_close_removes_entry_while_still_referenced() {
        let fixture = Fixture::new();
        let arial = native("Arial");

        let closed = fixture.get(&arial);
        closed.base.close();
        assert!(fixture.registry.is_empty());
        assert_eq!(closed.base.resource().err(), Some(InteropError::Closed));

        let fresh = fixture.get(&arial);
        assert!(!Arc::ptr_eq(&closed, &fresh));
        assert!(!fresh.base.is_closed());

        // 关闭后的包装对象被释放时不会再次注销
        drop(closed);
        assert_eq!(fixture.registry.len(), 1);
    }

    #[test]
    fn test_failed_construction_leaves_registry_unmodified() {
        let fixture = Fixture::new();
        let calibri = native("Calibri");

        let result = fixture
            .registry
            .get_or_create(&calibri, |_, _| Err(InteropError::Construction("font not installed".into())));
        assert_eq!(result.err(), Some(InteropError::Construction("font not installed".into())));
        assert_eq!(fixture.registry.report(), RegistryReport::default());
    }

    #[test]
    #[should_panic(expected = "already has a live wrapper")]
    fn test_add_over_live_wrapper_is_fatal() {
        let fixture = Fixture::new();
        let georgia = native("Georgia");
        let _wrapper = fixture.get(&georgia);

        let _ = fixture.registry.add(&georgia, |native, registration| {
            Ok(Arc::new(Format {
                base: WrapperBase::new(native, registration),
                serial: usize::MAX,
            }))
        });
    }

    #[test]
    fn test_constructor_may_reenter_registry() {
        let registry = ResourceRegistry::<NativeFormat, Format>::new();
        let fallback = native("Segoe UI Symbol");
        let primary = native("Segoe UI");

        let wrapper = registry
            .get_or_create(&primary, |native, registration| {
                // 构造过程中解析回退字体，走同一个注册表
                let nested = registry.get_or_create(&fallback, |native, registration| {
                    Ok(Arc::new(Format {
                        base: WrapperBase::new(native, registration),
                        serial: 1,
                    }))
                })?;
                assert_eq!(nested.serial, 1);
                Ok(Arc::new(Format {
                    base: WrapperBase::new(native, registration),
                    serial: 0,
                }))
            })
            .unwrap();

        assert_eq!(wrapper.serial, 0);
        // 回退字体的包装对象已被释放，只剩主字体
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_concurrent_requests_construct_once() {
        let fixture = Fixture::new();
        let shared = native("Cascadia Code");

        let wrappers: Vec<Arc<Format>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8).map(|_| scope.spawn(|| fixture.get(&shared))).collect();
            handles.into_iter().map(|handle| handle.join().unwrap()).collect()
        });

        assert_eq!(fixture.constructed.load(Ordering::SeqCst), 1);
        assert!(wrappers.iter().all(|w| Arc::ptr_eq(w, &wrappers[0])));
    }
}
