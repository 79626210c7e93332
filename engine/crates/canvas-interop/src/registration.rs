use crate::identity::ResourceIdentity;
use slotmap::new_key_type;
use std::fmt;
use std::sync::Arc;

new_key_type! {
    /// 身份表条目的代际索引，用来识别重复注销
    pub struct EntryKey;
}

/// 包装对象关闭时需要通知的注册表
pub trait RegistryLink: Send + Sync {
    /// 删除 `key` 对应的条目
    ///
    /// 条目不存在说明同一个包装对象注销了两次，实现方必须 panic。
    fn unregister(&self, identity: ResourceIdentity, key: EntryKey);
}

/// 包装对象在注册表中的登记凭证
///
/// 只能由注册表在构造包装对象时发出，并且只能被消费一次：
/// [`unregister`](Registration::unregister) 按值接收 `self`，同一份凭证不可能注销两次。
pub struct Registration {
    owner: Arc<dyn RegistryLink>,
    identity: ResourceIdentity,
    key: EntryKey,
}

impl Registration {
    pub(crate) fn new(owner: Arc<dyn RegistryLink>, identity: ResourceIdentity, key: EntryKey) -> Self {
        Self { owner, identity, key }
    }

    #[inline]
    pub fn identity(&self) -> ResourceIdentity {
        self.identity
    }

    #[inline]
    pub fn key(&self) -> EntryKey {
        self.key
    }

    /// 通知注册表删除条目
    pub fn unregister(self) {
        log::trace!("unregister {:?} ({:?})", self.identity, self.key);
        self.owner.unregister(self.identity, self.key);
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration").field("identity", &self.identity).field("key", &self.key).finish()
    }
}
