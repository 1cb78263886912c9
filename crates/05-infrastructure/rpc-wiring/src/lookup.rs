//! 协作对象查找
//!
//! 空标识不贡献任何对象；逗号分隔的列表按顺序逐个查找，任一失败即整体失败。

use infrastructure_common::LookupError;
use once_cell::sync::Lazy;
use regex::Regex;
use rpc_abstractions::{Collaborator, NamingContext};
use std::any::Any;
use std::sync::Arc;

static COMMA_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*[,]+\s*").expect("逗号分隔正则无效"));

/// 拆分逗号分隔的标识列表，忽略空元素
pub fn split_ids(value: &str) -> Vec<&str> {
    COMMA_SPLIT
        .split(value.trim())
        .filter(|id| !id.is_empty())
        .collect()
}

/// 基于命名上下文的协作对象查找
pub struct CollaboratorLookup<'a> {
    context: &'a dyn NamingContext,
}

impl<'a> CollaboratorLookup<'a> {
    /// 创建查找器
    pub fn new(context: &'a dyn NamingContext) -> Self {
        Self { context }
    }

    /// 查找单个协作对象，标识为空时返回 `None`
    pub fn single<T: Collaborator>(&self, id: &str) -> Result<Option<Arc<T>>, LookupError> {
        let id = id.trim();
        if id.is_empty() {
            return Ok(None);
        }
        let object = self.context.lookup(id, T::KIND)?;
        downcast::<T>(object, id).map(Some)
    }

    /// 按顺序查找逗号分隔的协作对象列表
    pub fn list<T: Collaborator>(&self, ids: &str) -> Result<Vec<Arc<T>>, LookupError> {
        split_ids(ids)
            .into_iter()
            .map(|id| {
                let object = self.context.lookup(id, T::KIND)?;
                downcast::<T>(object, id)
            })
            .collect()
    }

    /// 显式标识优先，未声明时使用唯一的默认配置
    pub fn single_or_default<T: Collaborator>(
        &self,
        id: &str,
    ) -> Result<Option<Arc<T>>, LookupError> {
        if let Some(found) = self.single::<T>(id)? {
            return Ok(Some(found));
        }
        let mut defaults = self.defaults::<T>();
        match defaults.len() {
            0 => Ok(None),
            1 => Ok(defaults.pop()),
            count => Err(LookupError::AmbiguousDefault {
                kind: T::KIND,
                count,
            }),
        }
    }

    /// 显式列表优先，未声明时使用全部默认配置
    pub fn list_or_default<T: Collaborator>(&self, ids: &str) -> Result<Vec<Arc<T>>, LookupError> {
        let explicit = self.list::<T>(ids)?;
        if explicit.is_empty() {
            Ok(self.defaults::<T>())
        } else {
            Ok(explicit)
        }
    }

    fn defaults<T: Collaborator>(&self) -> Vec<Arc<T>> {
        self.context
            .defaults(T::KIND)
            .into_iter()
            .filter_map(|object| object.downcast::<T>().ok())
            .collect()
    }
}

fn downcast<T: Collaborator>(
    object: Arc<dyn Any + Send + Sync>,
    id: &str,
) -> Result<Arc<T>, LookupError> {
    object
        .downcast::<T>()
        .map_err(|_| LookupError::TypeMismatch {
            kind: T::KIND,
            id: id.to_string(),
            expected: std::any::type_name::<T>(),
        })
}
