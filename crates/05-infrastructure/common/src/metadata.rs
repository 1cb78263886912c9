//! 元数据定义
//!
//! 提供托管对象类型、注入点以及引用/导出声明的元数据

use crate::identity::ContractInfo;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 类型信息
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 完整类型名称（包含模块路径）
    pub name: String,
    /// 该类型实现的能力契约
    pub contracts: Vec<ContractInfo>,
}

impl TypeInfo {
    /// 创建新的类型信息
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contracts: Vec::new(),
        }
    }

    /// 从类型获取类型信息
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::new(std::any::type_name::<T>())
    }

    /// 添加实现的契约
    pub fn with_contract(mut self, contract: ContractInfo) -> Self {
        self.contracts.push(contract);
        self
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &str {
        self.name.rsplit("::").next().unwrap_or(&self.name)
    }
}

/// 协作对象类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CollaboratorKind {
    /// 注册中心
    Registry,
    /// 应用描述
    Application,
    /// 模块描述
    Module,
    /// 监控中心
    Monitor,
    /// 协议
    Protocol,
    /// 消费者配置
    Consumer,
    /// 提供者配置
    Provider,
}

impl CollaboratorKind {
    /// 协作对象类型名称
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registry => "registry",
            Self::Application => "application",
            Self::Module => "module",
            Self::Monitor => "monitor",
            Self::Protocol => "protocol",
            Self::Consumer => "consumer",
            Self::Provider => "provider",
        }
    }
}

impl fmt::Display for CollaboratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 注入点的静态类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionPointType {
    /// 注入点类型名称
    pub type_name: String,
    /// 当注入点类型本身是能力契约时的契约信息
    pub contract: Option<ContractInfo>,
}

impl InjectionPointType {
    /// 契约类型的注入点，例如 `Arc<dyn PayService>`
    pub fn contract(type_name: impl Into<String>, contract: ContractInfo) -> Self {
        Self {
            type_name: type_name.into(),
            contract: Some(contract),
        }
    }

    /// 具体类型的注入点
    pub fn concrete(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            contract: None,
        }
    }
}

/// 引用声明
///
/// 字符串字段为空表示未设置；`registry` 可以是逗号分隔的列表。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceMarker {
    pub interface_name: String,
    pub interface: Option<ContractInfo>,
    pub group: String,
    pub version: String,
    pub registry: String,
    pub consumer: String,
    pub monitor: String,
    pub application: String,
    pub module: String,
    /// 直连地址
    pub url: String,
    pub timeout: Option<u64>,
    pub retries: Option<u32>,
    /// 启动时是否检查提供者可用
    pub check: Option<bool>,
}

impl ReferenceMarker {
    /// 创建空的引用声明
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interface_name(mut self, name: impl Into<String>) -> Self {
        self.interface_name = name.into();
        self
    }

    pub fn with_interface(mut self, contract: ContractInfo) -> Self {
        self.interface = Some(contract);
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_registry(mut self, registry: impl Into<String>) -> Self {
        self.registry = registry.into();
        self
    }

    pub fn with_consumer(mut self, consumer: impl Into<String>) -> Self {
        self.consumer = consumer.into();
        self
    }

    pub fn with_monitor(mut self, monitor: impl Into<String>) -> Self {
        self.monitor = monitor.into();
        self
    }

    pub fn with_application(mut self, application: impl Into<String>) -> Self {
        self.application = application.into();
        self
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    pub fn with_check(mut self, check: bool) -> Self {
        self.check = Some(check);
        self
    }
}

/// 导出声明
///
/// `registry` 与 `protocol` 可以是逗号分隔的列表。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceMarker {
    pub interface: Option<ContractInfo>,
    pub interface_name: String,
    pub group: String,
    pub version: String,
    pub registry: String,
    pub protocol: String,
    pub provider: String,
    pub monitor: String,
    pub application: String,
    pub module: String,
    pub timeout: Option<u64>,
    pub retries: Option<u32>,
}

impl ServiceMarker {
    /// 创建空的导出声明
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interface(mut self, contract: ContractInfo) -> Self {
        self.interface = Some(contract);
        self
    }

    pub fn with_interface_name(mut self, name: impl Into<String>) -> Self {
        self.interface_name = name.into();
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_registry(mut self, registry: impl Into<String>) -> Self {
        self.registry = registry.into();
        self
    }

    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    pub fn with_monitor(mut self, monitor: impl Into<String>) -> Self {
        self.monitor = monitor.into();
        self
    }

    pub fn with_application(mut self, application: impl Into<String>) -> Self {
        self.application = application.into();
        self
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }
}

/// 注入点种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// 字段
    Field,
    /// setter 方法
    Setter,
}

impl MemberKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Field => "字段",
            Self::Setter => "setter 方法",
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 携带引用声明的注入点
#[derive(Debug, Clone)]
pub struct ReferencePoint {
    /// 成员名称
    pub member: String,
    /// 成员种类
    pub kind: MemberKind,
    /// 注入点静态类型
    pub target_type: InjectionPointType,
    /// 引用声明
    pub marker: ReferenceMarker,
}

impl ReferencePoint {
    /// 创建字段注入点
    pub fn field(
        member: impl Into<String>,
        target_type: InjectionPointType,
        marker: ReferenceMarker,
    ) -> Self {
        Self {
            member: member.into(),
            kind: MemberKind::Field,
            target_type,
            marker,
        }
    }

    /// 创建 setter 注入点
    pub fn setter(
        member: impl Into<String>,
        target_type: InjectionPointType,
        marker: ReferenceMarker,
    ) -> Self {
        Self {
            member: member.into(),
            kind: MemberKind::Setter,
            target_type,
            marker,
        }
    }
}
