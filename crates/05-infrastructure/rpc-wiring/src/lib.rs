//! # RPC Wiring
//!
//! 注解驱动的远程服务装配实现。
//!
//! ## 组成
//!
//! - [`identity`] - 根据声明解析能力标识
//! - [`lookup`] - 按标识查找协作对象，支持默认配置
//! - [`reference_cache`] - 并发安全的引用缓存，同一标识只保留一个句柄
//! - [`export_registry`] - 已导出服务的登记表
//! - [`processor`] - 生命周期协调：注入引用、导出服务、关闭时统一销毁
//! - [`config`] - 扫描包与协作对象目录配置
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use rpc_wiring::{AnnotationProcessor, WiringConfig};
//!
//! let config = WiringConfig::load()?;
//! let processor = AnnotationProcessor::builder()
//!     .with_config(&config)
//!     .with_reference_finalizer(reference_finalizer)
//!     .with_export_finalizer(export_finalizer)
//!     .build()?;
//!
//! processor.before_initialization(&mut controller, "checkoutController").await?;
//! let service = processor.after_initialization(service, "payService").await?;
//! let report = processor.on_shutdown().await;
//! ```

pub mod config;
pub mod export_registry;
pub mod identity;
pub mod lookup;
pub mod naming;
pub mod processor;
pub mod reference_cache;

pub use config::{CollaboratorCatalog, PackageFilter, WiringConfig};
pub use export_registry::{ExportEntry, ExportRegistry};
pub use identity::{resolve_reference, resolve_service, ResolvedReference, ResolvedService};
pub use lookup::{split_ids, CollaboratorLookup};
pub use naming::InMemoryNamingContext;
pub use processor::{AnnotationProcessor, AnnotationProcessorBuilder};
pub use reference_cache::{ReferenceCache, ReferenceCacheStats};

pub use rpc_abstractions::ObjectPostProcessor;
