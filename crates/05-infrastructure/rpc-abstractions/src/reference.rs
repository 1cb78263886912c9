//! 引用终结抽象接口

use crate::collaborators::{
    ApplicationConfig, ConsumerConfig, ModuleConfig, MonitorConfig, RegistryConfig,
};
use async_trait::async_trait;
use infrastructure_common::{CapabilityIdentity, ContractInfo, FinalizeError, ServiceProxy};
use std::sync::Arc;

/// 已完成协作对象解析的引用描述
#[derive(Debug, Clone)]
pub struct ReferenceConfig {
    /// 能力标识
    pub identity: CapabilityIdentity,
    /// 契约类型（以名称声明时为空）
    pub contract: Option<ContractInfo>,
    pub registries: Vec<Arc<RegistryConfig>>,
    pub consumer: Option<Arc<ConsumerConfig>>,
    pub monitor: Option<Arc<MonitorConfig>>,
    pub application: Option<Arc<ApplicationConfig>>,
    pub module: Option<Arc<ModuleConfig>>,
    /// 直连地址
    pub url: Option<String>,
    pub timeout: Option<u64>,
    pub retries: Option<u32>,
    pub check: Option<bool>,
}

impl ReferenceConfig {
    /// 创建仅包含标识的引用描述
    pub fn new(identity: CapabilityIdentity) -> Self {
        Self {
            identity,
            contract: None,
            registries: Vec::new(),
            consumer: None,
            monitor: None,
            application: None,
            module: None,
            url: None,
            timeout: None,
            retries: None,
            check: None,
        }
    }
}

/// 引用句柄
///
/// 由引用缓存共享持有，直到容器关闭。
#[async_trait]
pub trait ReferenceHandle: Send + Sync {
    /// 可注入的远程服务代理
    fn proxy(&self) -> ServiceProxy;

    /// 销毁引用，释放底层连接
    async fn destroy(&self) -> Result<(), FinalizeError>;
}

/// 引用终结器 trait
///
/// 将引用描述转换为可用的引用句柄，可能建立远程连接。
#[async_trait]
pub trait ReferenceFinalizer: Send + Sync {
    /// 终结引用描述
    async fn finalize_reference(
        &self,
        config: ReferenceConfig,
    ) -> Result<Arc<dyn ReferenceHandle>, FinalizeError>;
}
