//! 内存命名上下文实现

use infrastructure_common::{CollaboratorKind, LookupError};
use parking_lot::RwLock;
use rpc_abstractions::{Collaborator, NamingContext};
use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
struct NamedEntry {
    object: Arc<dyn Any + Send + Sync>,
    is_default: bool,
}

/// 内存命名上下文
///
/// 以 `(类型, 标识)` 为键保存协作对象，默认配置按标识排序返回。
#[derive(Default)]
pub struct InMemoryNamingContext {
    entries: RwLock<BTreeMap<(CollaboratorKind, String), NamedEntry>>,
}

impl InMemoryNamingContext {
    /// 创建空的命名上下文
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册协作对象，同类型同标识的旧对象会被替换
    pub fn register<T: Collaborator>(&self, id: impl Into<String>, config: T) {
        let id = id.into();
        debug!("注册协作对象: {} '{}'", T::KIND, id);
        let entry = NamedEntry {
            is_default: config.is_default(),
            object: Arc::new(config),
        };
        self.entries.write().insert((T::KIND, id), entry);
    }

    /// 是否存在指定协作对象
    pub fn contains(&self, id: &str, kind: CollaboratorKind) -> bool {
        self.entries.read().contains_key(&(kind, id.to_string()))
    }

    /// 协作对象总数
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl std::fmt::Debug for InMemoryNamingContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<String> = self
            .entries
            .read()
            .keys()
            .map(|(kind, id)| format!("{}:{}", kind, id))
            .collect();
        f.debug_struct("InMemoryNamingContext")
            .field("entries", &keys)
            .finish()
    }
}

impl NamingContext for InMemoryNamingContext {
    fn lookup(
        &self,
        id: &str,
        kind: CollaboratorKind,
    ) -> Result<Arc<dyn Any + Send + Sync>, LookupError> {
        self.entries
            .read()
            .get(&(kind, id.to_string()))
            .map(|entry| entry.object.clone())
            .ok_or_else(|| LookupError::NotFound {
                kind,
                id: id.to_string(),
            })
    }

    fn defaults(&self, kind: CollaboratorKind) -> Vec<Arc<dyn Any + Send + Sync>> {
        self.entries
            .read()
            .iter()
            .filter(|((entry_kind, _), entry)| *entry_kind == kind && entry.is_default)
            .map(|(_, entry)| entry.object.clone())
            .collect()
    }
}
