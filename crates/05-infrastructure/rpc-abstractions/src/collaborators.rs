//! 协作对象配置
//!
//! 注册中心、应用、模块、监控、协议、消费者与提供者配置。
//! 这些对象由命名上下文按标识提供，`default` 未设置或为 `true` 时视为默认配置。

use infrastructure_common::CollaboratorKind;
use serde::{Deserialize, Serialize};
use std::any::Any;

/// 未声明协议时使用的协议名称
pub const DEFAULT_PROTOCOL: &str = "dubbo";

/// 协作对象 trait
pub trait Collaborator: Any + Send + Sync {
    /// 协作对象类型
    const KIND: CollaboratorKind;

    /// 是否可作为默认配置
    fn is_default(&self) -> bool;
}

/// 注册中心配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub address: String,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// 注册超时时间（毫秒）
    #[serde(default)]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub default: Option<bool>,
}

impl RegistryConfig {
    /// 创建注册中心配置
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    /// 运行环境，例如 develop / test / product
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub default: Option<bool>,
}

impl ApplicationConfig {
    /// 创建应用配置
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// 模块配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleConfig {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub default: Option<bool>,
}

/// 监控中心配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub default: Option<bool>,
}

/// 协议配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolConfig {
    pub name: String,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub serialization: Option<String>,
    #[serde(default)]
    pub threads: Option<usize>,
    #[serde(default)]
    pub default: Option<bool>,
}

impl ProtocolConfig {
    /// 创建协议配置
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: None,
            port: None,
            serialization: None,
            threads: None,
            default: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PROTOCOL)
    }
}

/// 消费者默认配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerConfig {
    #[serde(default)]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub retries: Option<u32>,
    #[serde(default)]
    pub check: Option<bool>,
    #[serde(default)]
    pub default: Option<bool>,
}

/// 提供者默认配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub retries: Option<u32>,
    #[serde(default)]
    pub default: Option<bool>,
}

macro_rules! impl_collaborator {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Collaborator for $ty {
                const KIND: CollaboratorKind = CollaboratorKind::$kind;

                fn is_default(&self) -> bool {
                    self.default.unwrap_or(true)
                }
            }
        )*
    };
}

impl_collaborator! {
    RegistryConfig => Registry,
    ApplicationConfig => Application,
    ModuleConfig => Module,
    MonitorConfig => Monitor,
    ProtocolConfig => Protocol,
    ConsumerConfig => Consumer,
    ProviderConfig => Provider,
}
