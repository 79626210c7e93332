use crate::identity::ResourceIdentity;
use crate::registration::EntryKey;
use slotmap::SlotMap;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

/// 注册表的状态快照，用于诊断
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistryReport {
    /// 当前可被查找到的身份数量（包含弱引用已失效、尚未注销的条目）
    pub entries: usize,
    /// 其中包装对象仍然活着的数量
    pub live: usize,
    /// 被顶替、等待旧包装对象注销的条目
    pub retired: usize,
    /// 正在构造中的条目
    pub pending: usize,
    /// 探针数量，单类型注册表恒为 0
    pub probes: usize,
}

struct Entry<W: ?Sized> {
    identity: ResourceIdentity,
    /// `None` 表示包装对象还在构造
    wrapper: Option<Weak<W>>,
    /// 死条目被新包装对象顶替后置位，等待旧包装对象自己注销
    retired: bool,
}

/// 身份表
///
/// 单类型注册表与全局注册表共用的实现：身份 -> 包装对象的弱引用。
/// 条目存放在 SlotMap 中，包装对象持有条目的代际索引，注销时凭索引删除，
/// 因此重复注销、注销错误的条目都能被识别出来。
///
/// 本身不加锁，由持有它的注册表串行化所有访问。
/// 所有方法都只操作弱引用，不会在内部丢弃包装对象的强引用。
pub struct IdentityMap<W: ?Sized> {
    entries: SlotMap<EntryKey, Entry<W>>,
    /// 身份 -> 当前条目
    index: HashMap<ResourceIdentity, EntryKey>,
    /// 正在构造的条目
    pending: Vec<EntryKey>,
}

impl<W: ?Sized> Default for IdentityMap<W> {
    fn default() -> Self {
        Self::new()
    }
}

// new & init
impl<W: ?Sized> IdentityMap<W> {
    pub fn new() -> Self {
        Self {
            entries: SlotMap::with_key(),
            index: HashMap::new(),
            pending: Vec::new(),
        }
    }
}

// getter
impl<W: ?Sized> IdentityMap<W> {
    /// 查找活着的包装对象，弱引用失效时视为不存在
    pub fn get(&self, identity: ResourceIdentity) -> Option<Arc<W>> {
        let key = self.index.get(&identity)?;
        self.entries.get(*key)?.wrapper.as_ref()?.upgrade()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn report(&self) -> RegistryReport {
        let live = self
            .index
            .values()
            .filter_map(|key| self.entries.get(*key))
            .filter(|entry| entry.wrapper.as_ref().is_some_and(|weak| weak.strong_count() > 0))
            .count();
        RegistryReport {
            entries: self.index.len(),
            live,
            retired: self.entries.values().filter(|entry| entry.retired).count(),
            pending: self.pending.len(),
            probes: 0,
        }
    }

    fn is_pending(&self, identity: ResourceIdentity) -> bool {
        self.pending.iter().any(|key| self.entries.get(*key).is_some_and(|entry| entry.identity == identity))
    }
}

// add
impl<W: ?Sized> IdentityMap<W> {
    /// 为即将构造的包装对象预留条目
    ///
    /// 预留的条目在 [`commit`](Self::commit) 之前不会出现在索引里，
    /// 构造失败时 [`cancel`](Self::cancel) 掉即可，身份表保持原样。
    ///
    /// # Panics
    /// 身份已有活着的包装对象，或者同一身份正在构造（构造函数回调注册表请求了自身）。
    pub fn reserve(&mut self, identity: ResourceIdentity) -> EntryKey {
        if let Some(key) = self.index.get(&identity) {
            let live = self
                .entries
                .get(*key)
                .and_then(|entry| entry.wrapper.as_ref())
                .is_some_and(|weak| weak.strong_count() > 0);
            if live {
                panic!("unexpected state: {identity:?} already has a live wrapper");
            }
        }
        if self.is_pending(identity) {
            panic!("unexpected state: {identity:?} is already being constructed");
        }

        let key = self.entries.insert(Entry {
            identity,
            wrapper: None,
            retired: false,
        });
        self.pending.push(key);
        key
    }

    /// 构造成功，把包装对象登记到索引
    ///
    /// 身份原先对应的死条目被标记为 retired。
    /// 返回 `false` 表示包装对象在构造期间就已经关闭，条目不会登记。
    pub fn commit(&mut self, key: EntryKey, wrapper: Weak<W>) -> bool {
        self.pending.retain(|pending| *pending != key);
        let Some(entry) = self.entries.get_mut(key) else {
            return false;
        };
        entry.wrapper = Some(wrapper);
        let identity = entry.identity;

        if let Some(previous) = self.index.insert(identity, key) {
            log::warn!("{identity:?}: replacing an entry whose wrapper died before unregistering");
            if let Some(previous) = self.entries.get_mut(previous) {
                previous.retired = true;
            }
        }
        true
    }

    /// 构造失败，丢弃预留的条目
    pub fn cancel(&mut self, key: EntryKey) {
        self.pending.retain(|pending| *pending != key);
        self.entries.remove(key);
    }
}

// remove
impl<W: ?Sized> IdentityMap<W> {
    /// 删除条目
    ///
    /// # Panics
    /// 条目不存在（重复注销或从未添加），或条目与身份不符。
    pub fn remove(&mut self, identity: ResourceIdentity, key: EntryKey) {
        let Some(entry) = self.entries.get(key) else {
            panic!("unexpected state: {identity:?} is not registered ({key:?})");
        };
        if entry.identity != identity {
            panic!("unexpected state: {key:?} belongs to {:?}, not {identity:?}", entry.identity);
        }
        let retired = entry.retired;
        self.entries.remove(key);

        if retired {
            return;
        }
        if self.pending.contains(&key) {
            // 包装对象在构造过程中就被关闭了
            self.pending.retain(|pending| *pending != key);
            return;
        }
        match self.index.get(&identity) {
            Some(current) if *current == key => {
                self.index.remove(&identity);
            }
            _ => panic!("unexpected state: {identity:?} index does not point at {key:?}"),
        }
    }
}
