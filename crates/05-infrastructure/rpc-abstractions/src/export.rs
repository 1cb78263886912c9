//! 服务导出抽象接口

use crate::collaborators::{
    ApplicationConfig, ModuleConfig, MonitorConfig, ProtocolConfig, ProviderConfig,
    RegistryConfig,
};
use async_trait::async_trait;
use infrastructure_common::{CapabilityIdentity, ContractInfo, FinalizeError};
use std::any::Any;
use std::sync::Arc;

/// 已完成协作对象解析的导出描述
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// 能力标识
    pub identity: CapabilityIdentity,
    /// 契约类型（以名称声明时为空）
    pub contract: Option<ContractInfo>,
    /// 实现类型名称
    pub implementation: String,
    pub registries: Vec<Arc<RegistryConfig>>,
    pub protocols: Vec<Arc<ProtocolConfig>>,
    pub provider: Option<Arc<ProviderConfig>>,
    pub monitor: Option<Arc<MonitorConfig>>,
    pub application: Option<Arc<ApplicationConfig>>,
    pub module: Option<Arc<ModuleConfig>>,
    pub timeout: Option<u64>,
    pub retries: Option<u32>,
}

impl ServiceConfig {
    /// 创建仅包含标识的导出描述
    pub fn new(identity: CapabilityIdentity, implementation: impl Into<String>) -> Self {
        Self {
            identity,
            contract: None,
            implementation: implementation.into(),
            registries: Vec::new(),
            protocols: Vec::new(),
            provider: None,
            monitor: None,
            application: None,
            module: None,
            timeout: None,
            retries: None,
        }
    }
}

/// 导出登记
#[async_trait]
pub trait ExportRegistration: Send + Sync {
    /// 取消导出
    async fn unexport(&self) -> Result<(), FinalizeError>;
}

/// 导出终结器 trait
#[async_trait]
pub trait ExportFinalizer: Send + Sync {
    /// 将实现对象按导出描述暴露为远程服务
    async fn finalize_export(
        &self,
        config: ServiceConfig,
        target: Arc<dyn Any + Send + Sync>,
    ) -> Result<Arc<dyn ExportRegistration>, FinalizeError>;
}
