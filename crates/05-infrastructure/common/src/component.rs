//! 托管对象接口定义
//!
//! 容器中的对象通过此 trait 暴露引用/导出声明，
//! 通常由 `rpc_macros::ManagedObject` 派生宏生成。

use crate::errors::InjectionError;
use crate::metadata::{ReferencePoint, ServiceMarker, TypeInfo};
use std::any::Any;
use std::sync::Arc;

/// 已解析的远程服务代理
///
/// 内部存放的是 `Arc<dyn Contract>`，注入时按注入点类型向下转型。
pub type ServiceProxy = Arc<dyn Any + Send + Sync>;

/// 托管对象 trait
///
/// 标记查询必须是确定性的纯查询：同一类型多次调用返回相同结果。
pub trait ManagedObject: Send + Sync + 'static {
    /// 具体类型信息，包括实现的契约
    fn type_info(&self) -> TypeInfo;

    /// 按声明顺序列出携带引用声明的注入点
    fn reference_points(&self) -> Vec<ReferencePoint> {
        Vec::new()
    }

    /// 导出声明
    fn service_marker(&self) -> Option<ServiceMarker> {
        None
    }

    /// 将代理写入指定成员
    ///
    /// 默认实现委托给代理目标；非代理对象必须自行实现。
    fn inject_reference(&mut self, member: &str, proxy: ServiceProxy) -> Result<(), InjectionError> {
        match self.proxy_target_mut() {
            Some(target) => target.inject_reference(member, proxy),
            None => Err(InjectionError::UnknownMember {
                member: member.to_string(),
            }),
        }
    }

    /// 透明代理包装的目标对象
    fn proxy_target(&self) -> Option<&dyn ManagedObject> {
        None
    }

    /// 透明代理包装的目标对象（可变）
    fn proxy_target_mut(&mut self) -> Option<&mut dyn ManagedObject> {
        None
    }

    /// 转换为导出目标
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// 展开所有透明代理层，返回最内层的具体对象
pub fn concrete_target(object: &dyn ManagedObject) -> &dyn ManagedObject {
    match object.proxy_target() {
        Some(inner) => concrete_target(inner),
        None => object,
    }
}
