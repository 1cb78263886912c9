//! # RPC Wiring Abstractions
//!
//! 远程服务装配的外部协作接口。
//!
//! ## 核心接口
//!
//! - [`NamingContext`] - 按标识查找协作对象
//! - [`ReferenceFinalizer`] / [`ReferenceHandle`] - 引用终结与销毁
//! - [`ExportFinalizer`] / [`ExportRegistration`] - 服务导出与取消导出
//! - [`ObjectPostProcessor`] - 容器生命周期钩子

pub mod collaborators;
pub mod export;
pub mod naming;
pub mod processor;
pub mod reference;

pub use collaborators::*;
pub use export::*;
pub use naming::*;
pub use processor::*;
pub use reference::*;
