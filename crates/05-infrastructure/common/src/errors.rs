//! 错误类型定义

use crate::metadata::{CollaboratorKind, MemberKind};
use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// 协作对象查找错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("协作对象不存在: {kind} '{id}'")]
    NotFound { kind: CollaboratorKind, id: String },

    #[error("协作对象类型不匹配: {kind} '{id}', 期望 {expected}")]
    TypeMismatch {
        kind: CollaboratorKind,
        id: String,
        expected: &'static str,
    },

    #[error("存在 {count} 个默认 {kind} 配置，无法确定使用哪一个")]
    AmbiguousDefault { kind: CollaboratorKind, count: usize },
}

/// 终结错误
///
/// 外部引用/导出调用的所有失败都归一化为此类型，保留原始消息和原因。
#[derive(Error, Debug)]
#[error("{message}")]
pub struct FinalizeError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl FinalizeError {
    /// 创建仅包含消息的终结错误
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// 包装外部错误，消息取自原始错误
    pub fn wrap<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: error.to_string(),
            source: Some(Box::new(error)),
        }
    }

    /// 使用自定义消息包装外部错误
    pub fn with_source<E>(message: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            source: Some(Box::new(error)),
        }
    }

    /// 错误消息
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// 成员注入错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InjectionError {
    #[error("成员不存在或不可写: {member}")]
    UnknownMember { member: String },

    #[error("代理类型与成员类型不匹配: {member}, 期望 {expected}")]
    TypeMismatch { member: String, expected: String },
}

/// 装配错误类型
#[derive(Error, Debug)]
pub enum WiringError {
    #[error("远程服务配置错误: {subject}, 原因: {message}")]
    Configuration { subject: String, message: String },

    #[error("协作对象查找失败: {source}")]
    Lookup {
        #[from]
        source: LookupError,
    },

    #[error("远程服务终结失败: {source}")]
    Finalization {
        #[from]
        source: FinalizeError,
    },

    #[error("引用注入失败: {source}")]
    Injection {
        #[from]
        source: InjectionError,
    },

    #[error("初始化远程服务引用失败: {kind} {member}, 类型 {type_name}, 原因: {source}")]
    ReferenceInitialization {
        member: String,
        kind: MemberKind,
        type_name: String,
        #[source]
        source: Box<WiringError>,
    },

    #[error("导出远程服务失败: 类型 {type_name}, 原因: {source}")]
    ServiceExport {
        type_name: String,
        #[source]
        source: Box<WiringError>,
    },
}

impl WiringError {
    /// 创建配置错误
    pub fn configuration(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// 包装注入点上的失败
    pub fn reference_initialization(
        member: impl Into<String>,
        kind: MemberKind,
        type_name: impl Into<String>,
        source: WiringError,
    ) -> Self {
        Self::ReferenceInitialization {
            member: member.into(),
            kind,
            type_name: type_name.into(),
            source: Box::new(source),
        }
    }

    /// 包装导出过程中的失败
    pub fn service_export(type_name: impl Into<String>, source: WiringError) -> Self {
        Self::ServiceExport {
            type_name: type_name.into(),
            source: Box::new(source),
        }
    }

    /// 去掉对象级包装后的根错误
    pub fn root_cause(&self) -> &WiringError {
        match self {
            Self::ReferenceInitialization { source, .. } | Self::ServiceExport { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }

    /// 是否为配置错误
    pub fn is_configuration(&self) -> bool {
        matches!(self.root_cause(), Self::Configuration { .. })
    }

    /// 是否为协作对象查找错误
    pub fn is_lookup(&self) -> bool {
        matches!(self.root_cause(), Self::Lookup { .. })
    }

    /// 是否为终结错误
    pub fn is_finalization(&self) -> bool {
        matches!(self.root_cause(), Self::Finalization { .. })
    }
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type WiringResult<T> = Result<T, WiringError>;
