//! 容器错误类型

use super::bean::Capability;
use thiserror::Error;

/// Bean 查找错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BeanError {
    /// 整条查找链（本地集合 + 回退链）都没有满足该能力的 Bean
    #[error("Bean of type {capability} cannot be located")]
    NotFound { capability: Capability },

    /// 类型转换失败
    #[error("Type cast failed: expected {expected}")]
    TypeCastFailed { expected: &'static str },

    /// 自定义提供者内部失败
    #[error("Bean provider failed: {0}")]
    Provider(String),
}

impl BeanError {
    pub fn not_found(capability: Capability) -> Self {
        BeanError::NotFound { capability }
    }

    /// 是否为可恢复的“未找到”
    pub fn is_not_found(&self) -> bool {
        matches!(self, BeanError::NotFound { .. })
    }
}
