//! 命名上下文抽象接口

use infrastructure_common::{CollaboratorKind, LookupError};
use std::any::Any;
use std::sync::Arc;

/// 命名上下文 trait
///
/// 按字符串标识提供共享的协作对象。标识非空但无法解析时必须返回错误。
pub trait NamingContext: Send + Sync {
    /// 按标识查找协作对象
    fn lookup(
        &self,
        id: &str,
        kind: CollaboratorKind,
    ) -> Result<Arc<dyn Any + Send + Sync>, LookupError>;

    /// 指定类型的默认协作对象，按标识排序
    fn defaults(&self, _kind: CollaboratorKind) -> Vec<Arc<dyn Any + Send + Sync>> {
        Vec::new()
    }
}
