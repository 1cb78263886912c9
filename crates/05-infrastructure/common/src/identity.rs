//! 远程能力标识

use serde::{Deserialize, Serialize};
use std::fmt;

/// 能力契约信息
///
/// 契约即远程接口，在 Rust 中以 trait object 表示，例如 `dyn PayService`。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractInfo {
    /// 契约的完整名称
    pub name: String,
}

impl ContractInfo {
    /// 从 trait object 类型获取契约信息
    ///
    /// 名称取自 `std::any::type_name`，去掉 `dyn ` 前缀以及自动 trait 约束。
    pub fn of<T: ?Sized + 'static>() -> Self {
        let raw = std::any::type_name::<T>();
        let name = raw.strip_prefix("dyn ").unwrap_or(raw);
        let name = name.split(" + ").next().unwrap_or(name);
        Self {
            name: name.to_string(),
        }
    }

    /// 使用显式名称创建契约信息
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// 获取简短名称（不包含模块路径）
    pub fn short_name(&self) -> &str {
        self.name.rsplit("::").next().unwrap_or(&self.name)
    }
}

impl fmt::Display for ContractInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// 远程能力标识
///
/// 规范形式 `"<group>/<interfaceName>:<version>"` 是引用缓存的键，
/// 规范形式相同的两个标识必须解析到同一个引用句柄。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapabilityIdentity {
    /// 服务分组
    pub group: String,
    /// 接口名称
    pub interface_name: String,
    /// 服务版本
    pub version: String,
}

impl CapabilityIdentity {
    /// 创建新的能力标识
    pub fn new(
        group: impl Into<String>,
        interface_name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            interface_name: interface_name.into(),
            version: version.into(),
        }
    }

    /// 规范字符串形式
    pub fn canonical_key(&self) -> String {
        format!("{}/{}:{}", self.group, self.interface_name, self.version)
    }
}

impl fmt::Display for CapabilityIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.group, self.interface_name, self.version)
    }
}
