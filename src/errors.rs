use crate::clients::AgentError;
use crate::infrastructure::container::BeanError;
use thiserror::Error;

/// 统一错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Bean lookup error: {0}")]
    Bean(#[from] BeanError),
    #[error("Agent call error: {0}")]
    Agent(#[from] AgentError),
    #[error("Logging setup error: {0}")]
    Logging(String),
}

impl AppError {
    /// 记录错误到日志
    ///
    /// 未找到 Bean 通常由调用方自行处理，只记 debug。
    pub fn log(&self) {
        match self {
            AppError::Bean(e) if e.is_not_found() => {
                tracing::debug!(error = %self, "Bean not found");
            }
            AppError::Config(_) | AppError::Logging(_) => {
                tracing::error!(error = %self, "Setup failed");
            }
            _ => {
                tracing::warn!(error = %self, "Operation failed");
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read file '{0}': {1}")]
    FileRead(String, #[source] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("Configuration error: {0}")]
    Other(String),
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, AppError>;
