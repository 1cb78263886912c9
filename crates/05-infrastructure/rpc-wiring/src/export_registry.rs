//! 导出登记表
//!
//! 只记录导出调用成功的登记，用于关闭时批量取消导出；不按标识去重。

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use infrastructure_common::CapabilityIdentity;
use rpc_abstractions::ExportRegistration;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// 导出登记项
#[derive(Clone)]
pub struct ExportEntry {
    pub id: Uuid,
    pub identity: CapabilityIdentity,
    /// 实现类型名称
    pub implementation: String,
    pub registration: Arc<dyn ExportRegistration>,
    pub exported_at: DateTime<Utc>,
}

impl std::fmt::Debug for ExportEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportEntry")
            .field("id", &self.id)
            .field("identity", &self.identity)
            .field("implementation", &self.implementation)
            .field("exported_at", &self.exported_at)
            .finish()
    }
}

/// 导出登记表
#[derive(Debug, Default)]
pub struct ExportRegistry {
    entries: DashMap<Uuid, ExportEntry>,
}

impl ExportRegistry {
    /// 创建空登记表
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一个已成功导出的服务
    pub fn add(
        &self,
        identity: CapabilityIdentity,
        implementation: impl Into<String>,
        registration: Arc<dyn ExportRegistration>,
    ) -> Uuid {
        let entry = ExportEntry {
            id: Uuid::new_v4(),
            identity,
            implementation: implementation.into(),
            registration,
            exported_at: Utc::now(),
        };
        let id = entry.id;
        debug!("登记导出: {} ({})", entry.identity, entry.implementation);
        self.entries.insert(id, entry);
        id
    }

    /// 登记项数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 所有已导出的能力标识（同一标识可能出现多次）
    pub fn identities(&self) -> Vec<CapabilityIdentity> {
        self.entries
            .iter()
            .map(|entry| entry.identity.clone())
            .collect()
    }

    /// 取出全部登记项，每一项只会被取出一次
    pub fn drain(&self) -> Vec<ExportEntry> {
        let ids: Vec<Uuid> = self.entries.iter().map(|entry| *entry.key()).collect();
        let mut drained: Vec<ExportEntry> = ids
            .into_iter()
            .filter_map(|id| self.entries.remove(&id).map(|(_, entry)| entry))
            .collect();
        drained.sort_by_key(|entry| entry.exported_at);
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use infrastructure_common::FinalizeError;

    struct NoopRegistration;

    #[async_trait]
    impl ExportRegistration for NoopRegistration {
        async fn unexport(&self) -> Result<(), FinalizeError> {
            Ok(())
        }
    }

    #[test]
    fn test_same_identity_is_registered_twice() {
        let registry = ExportRegistry::new();
        let identity = CapabilityIdentity::new("", "com.acme.Pay", "1.0");

        let first = registry.add(identity.clone(), "PayV1", Arc::new(NoopRegistration));
        let second = registry.add(identity.clone(), "PayV2", Arc::new(NoopRegistration));

        assert_ne!(first, second);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.identities(), vec![identity.clone(), identity]);
    }

    #[test]
    fn test_drain_is_exhaustive_and_single_shot() {
        let registry = ExportRegistry::new();
        registry.add(
            CapabilityIdentity::new("", "com.acme.Pay", "1.0"),
            "PayV1",
            Arc::new(NoopRegistration),
        );

        let drained = registry.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].implementation, "PayV1");
        assert!(registry.drain().is_empty());
    }
}
