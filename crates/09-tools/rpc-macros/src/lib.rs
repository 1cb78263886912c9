//! # RPC Macros
//!
//! 为托管对象生成远程服务声明查询的派生宏。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use rpc_macros::ManagedObject;
//! use std::sync::Arc;
//!
//! pub trait PayService: Send + Sync {
//!     fn pay(&self, amount: u64) -> String;
//! }
//!
//! #[derive(ManagedObject)]
//! #[managed(implements(dyn PayService))]
//! #[service(version = "1.0", timeout = 3000)]
//! pub struct PayServiceImpl;
//!
//! #[derive(ManagedObject)]
//! pub struct CheckoutController {
//!     #[reference(version = "1.0", registry = "zk", check = false)]
//!     pay: Option<Arc<dyn PayService>>,
//! }
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod attributes;
mod managed;
mod utils;

/// 托管对象派生宏
///
/// 为结构体实现 `infrastructure_common::ManagedObject`。
///
/// # 属性
///
/// - `#[managed(implements(dyn A, dyn B))]` - 声明实现的契约
/// - `#[service(..)]` - 导出声明，支持 `interface`、`interface_name`、`group`、`version`、
///   `registry`、`protocol`、`provider`、`monitor`、`application`、`module`、`timeout`、`retries`
/// - 字段上的 `#[reference(..)]` - 引用声明，支持 `interface`、`interface_name`、`group`、
///   `version`、`registry`、`consumer`、`monitor`、`application`、`module`、`url`、
///   `timeout`、`retries`、`check`
///
/// 引用字段类型为 `Arc<dyn Contract>` 或 `Option<Arc<dyn Contract>>` 时按契约注入；
/// 其他类型视为具体类型，必须通过 `interface` 或 `interface_name` 指定接口。
#[proc_macro_derive(ManagedObject, attributes(managed, service, reference))]
pub fn derive_managed_object(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    managed::derive_managed_object_impl(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
