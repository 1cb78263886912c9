//! 容器生命周期钩子

use async_trait::async_trait;
use infrastructure_common::{ManagedObject, WiringError};
use std::sync::Arc;

/// 关闭结果统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    /// 成功取消导出的数量
    pub unexported: usize,
    /// 成功销毁的引用数量
    pub destroyed: usize,
    /// 失败并已记录日志的数量
    pub failures: usize,
}

impl ShutdownReport {
    /// 处理过的条目总数
    pub fn processed(&self) -> usize {
        self.unexported + self.destroyed + self.failures
    }
}

/// 对象后处理器 trait
///
/// 容器在对象初始化前后各调用一次，在容器关闭时调用 `on_shutdown`。
#[async_trait]
pub trait ObjectPostProcessor: Send + Sync {
    /// 初始化前：注入远程服务引用
    async fn before_initialization(
        &self,
        object: &mut dyn ManagedObject,
        name: &str,
    ) -> Result<(), WiringError>;

    /// 初始化后：导出声明的远程服务
    async fn after_initialization(
        &self,
        object: Arc<dyn ManagedObject>,
        name: &str,
    ) -> Result<Arc<dyn ManagedObject>, WiringError>;

    /// 容器关闭：尽力取消所有导出并销毁所有引用，从不返回错误
    async fn on_shutdown(&self) -> ShutdownReport;
}
