//! # Infrastructure Common
//!
//! 远程服务注解装配的公共类型与 traits。
//!
//! ## 核心类型
//!
//! - [`CapabilityIdentity`] - 远程能力标识 `(group, interfaceName, version)`
//! - [`ContractInfo`] - 能力契约（trait object）的类型信息
//! - [`ReferenceMarker`] / [`ServiceMarker`] - 引用与导出声明
//! - [`ManagedObject`] - 容器托管对象的标记内省接口
//! - [`WiringError`] - 装配过程中的错误分类
//!
//! ## 设计原则
//!
//! - 标记信息是对类型的纯查询，由派生宏或手写实现提供
//! - 透明代理通过 [`ManagedObject::proxy_target`] 逐层展开
//! - 所有构造路径错误同步返回，不做重试

pub mod component;
pub mod errors;
pub mod identity;
pub mod lifecycle;
pub mod metadata;

pub use component::*;
pub use errors::*;
pub use identity::*;
pub use lifecycle::*;
pub use metadata::*;
