//! 装配配置
//!
//! 通过 `config` crate 从 `config/rpc.{toml,json,yaml}` 与 `LORN_RPC` 前缀的环境变量加载。

use crate::lookup::split_ids;
use crate::naming::InMemoryNamingContext;
use infrastructure_common::{ConfigError, ConfigResult};
use rpc_abstractions::{
    ApplicationConfig, ConsumerConfig, ModuleConfig, MonitorConfig, ProtocolConfig,
    ProviderConfig, RegistryConfig,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, error};

/// 环境变量前缀
pub const ENV_PREFIX: &str = "LORN_RPC";

/// 默认配置文件（不含扩展名）
pub const DEFAULT_CONFIG_FILE: &str = "config/rpc";

/// 包前缀过滤器
///
/// 前缀列表为空时匹配所有类型。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageFilter {
    prefixes: Vec<String>,
}

impl PackageFilter {
    /// 从逗号分隔的包前缀列表创建过滤器
    pub fn parse(packages: &str) -> Self {
        Self {
            prefixes: split_ids(packages).into_iter().map(str::to_string).collect(),
        }
    }

    /// 类型名称是否在允许的包中
    pub fn matches(&self, type_name: &str) -> bool {
        self.prefixes.is_empty() || self.prefixes.iter().any(|p| type_name.starts_with(p.as_str()))
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}

/// 按标识命名的协作对象目录
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollaboratorCatalog {
    #[serde(default)]
    pub registries: BTreeMap<String, RegistryConfig>,
    #[serde(default)]
    pub applications: BTreeMap<String, ApplicationConfig>,
    #[serde(default)]
    pub modules: BTreeMap<String, ModuleConfig>,
    #[serde(default)]
    pub monitors: BTreeMap<String, MonitorConfig>,
    #[serde(default)]
    pub protocols: BTreeMap<String, ProtocolConfig>,
    #[serde(default)]
    pub consumers: BTreeMap<String, ConsumerConfig>,
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderConfig>,
}

impl CollaboratorCatalog {
    /// 将目录中的所有协作对象注册到命名上下文
    pub fn register_into(&self, context: &InMemoryNamingContext) {
        for (id, config) in &self.registries {
            context.register(id.clone(), config.clone());
        }
        for (id, config) in &self.applications {
            context.register(id.clone(), config.clone());
        }
        for (id, config) in &self.modules {
            context.register(id.clone(), config.clone());
        }
        for (id, config) in &self.monitors {
            context.register(id.clone(), config.clone());
        }
        for (id, config) in &self.protocols {
            context.register(id.clone(), config.clone());
        }
        for (id, config) in &self.consumers {
            context.register(id.clone(), config.clone());
        }
        for (id, config) in &self.providers {
            context.register(id.clone(), config.clone());
        }
    }

    /// 构建新的内存命名上下文
    pub fn to_naming_context(&self) -> InMemoryNamingContext {
        let context = InMemoryNamingContext::new();
        self.register_into(&context);
        context
    }
}

/// 注解装配配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WiringConfig {
    /// 逗号分隔的包前缀列表；未设置时整个装配过程为空操作
    #[serde(default)]
    pub package: Option<String>,
    /// 协作对象目录
    #[serde(default)]
    pub collaborators: CollaboratorCatalog,
}

impl WiringConfig {
    /// 从默认配置文件和环境变量加载
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// 从指定配置文件（可不存在）和环境变量加载
    pub fn load_from(file: &str) -> ConfigResult<Self> {
        debug!("加载装配配置: {}", file);
        let settings = config::Config::builder()
            .add_source(config::File::with_name(file).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .map_err(|e| {
                error!("装配配置构建失败: {}", e);
                ConfigError::ParseError {
                    source: Box::new(e),
                }
            })?;
        Self::bind(settings)
    }

    /// 从 TOML 文本加载
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(content, config::FileFormat::Toml))
            .build()
            .map_err(|e| ConfigError::ParseError {
                source: Box::new(e),
            })?;
        Self::bind(settings)
    }

    fn bind(settings: config::Config) -> ConfigResult<Self> {
        let config: Self = settings.try_deserialize().map_err(|e| {
            error!("装配配置绑定失败: {}", e);
            ConfigError::ParseError {
                source: Box::new(e),
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// 校验协作对象目录
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some((id, _)) = self
            .collaborators
            .registries
            .iter()
            .find(|(_, registry)| registry.address.trim().is_empty())
        {
            return Err(ConfigError::ValidationError {
                message: format!("注册中心 '{}' 缺少 address", id),
            });
        }
        if let Some((id, _)) = self
            .collaborators
            .applications
            .iter()
            .find(|(_, application)| application.name.trim().is_empty())
        {
            return Err(ConfigError::ValidationError {
                message: format!("应用 '{}' 缺少 name", id),
            });
        }
        Ok(())
    }

    /// 包过滤器；未配置包时返回 `None`
    pub fn package_filter(&self) -> Option<PackageFilter> {
        self.package.as_deref().map(PackageFilter::parse)
    }
}
