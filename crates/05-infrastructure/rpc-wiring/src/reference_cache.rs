//! 引用缓存
//!
//! 以能力标识的规范形式为键，保证每个键最多保留一个引用句柄。
//! 终结过程不持有任何锁；并发构造时先插入者胜出，失败者的候选句柄直接丢弃。

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use infrastructure_common::{CapabilityIdentity, WiringError};
use rpc_abstractions::ReferenceHandle;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// 缓存统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceCacheStats {
    /// 命中次数
    pub hits: u64,
    /// 未命中次数（每次未命中都会终结一个候选句柄）
    pub misses: u64,
    /// 竞争失败被丢弃的候选句柄数量
    pub discarded: u64,
    /// 当前缓存项数量
    pub size: usize,
}

/// 引用缓存
#[derive(Default)]
pub struct ReferenceCache {
    entries: DashMap<String, Arc<dyn ReferenceHandle>>,
    hits: AtomicU64,
    misses: AtomicU64,
    discarded: AtomicU64,
}

impl ReferenceCache {
    /// 创建空缓存
    pub fn new() -> Self {
        Self::default()
    }

    /// 解析引用句柄
    ///
    /// 命中时直接返回已有句柄，不会调用 `build`。未命中时调用 `build` 终结候选句柄，
    /// 再以原子方式插入；若其他调用者已先插入，则返回胜出者的句柄。
    pub async fn resolve<F, Fut>(
        &self,
        identity: &CapabilityIdentity,
        build: F,
    ) -> Result<Arc<dyn ReferenceHandle>, WiringError>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<Arc<dyn ReferenceHandle>, WiringError>> + Send,
    {
        let key = identity.canonical_key();
        if let Some(existing) = self.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(existing);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let candidate = build().await?;

        match self.entries.entry(key) {
            Entry::Occupied(occupied) => {
                debug!("引用 {} 已由其他调用者创建，丢弃本次候选句柄", occupied.key());
                self.discarded.fetch_add(1, Ordering::Relaxed);
                Ok(occupied.get().clone())
            }
            Entry::Vacant(vacant) => {
                debug!("缓存引用: {}", vacant.key());
                vacant.insert(candidate.clone());
                Ok(candidate)
            }
        }
    }

    /// 按规范键获取已缓存的句柄
    pub fn get(&self, key: &str) -> Option<Arc<dyn ReferenceHandle>> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// 是否已缓存指定标识
    pub fn contains(&self, identity: &CapabilityIdentity) -> bool {
        self.entries.contains_key(&identity.canonical_key())
    }

    /// 缓存项数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 已缓存的规范键
    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }

    /// 仅当缓存中仍是同一个句柄时将其移除并返回
    pub fn evict(
        &self,
        identity: &CapabilityIdentity,
        handle: &Arc<dyn ReferenceHandle>,
    ) -> Option<Arc<dyn ReferenceHandle>> {
        self.entries
            .remove_if(&identity.canonical_key(), |_, cached| Arc::ptr_eq(cached, handle))
            .map(|(_, cached)| cached)
    }

    /// 取出全部缓存项，每一项只会被取出一次
    pub fn drain(&self) -> Vec<(String, Arc<dyn ReferenceHandle>)> {
        self.keys()
            .into_iter()
            .filter_map(|key| self.entries.remove(&key))
            .collect()
    }

    /// 统计信息
    pub fn stats(&self) -> ReferenceCacheStats {
        ReferenceCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            size: self.entries.len(),
        }
    }
}

impl std::fmt::Debug for ReferenceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceCache")
            .field("keys", &self.keys())
            .field("stats", &self.stats())
            .finish()
    }
}
