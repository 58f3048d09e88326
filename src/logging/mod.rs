use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingSettings;
use crate::errors::AppError;

/// 日志环境配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingEnvironment {
    /// 开发环境
    Development,
    /// 测试环境
    Testing,
    /// 生产环境
    Production,
}

impl LoggingEnvironment {
    /// 该环境下配置文件日志段的默认值
    pub fn default_settings(self) -> LoggingSettings {
        let (level, format) = match self {
            LoggingEnvironment::Development => (Level::DEBUG, LogFormat::Pretty),
            LoggingEnvironment::Testing => (Level::ERROR, LogFormat::Compact),
            LoggingEnvironment::Production => (Level::INFO, LogFormat::Json),
        };
        LoggingSettings {
            level: level.as_str().to_lowercase(),
            format: format.as_str().to_string(),
        }
    }
}

/// 日志格式配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// 人类可读格式
    Pretty,
    /// JSON 格式
    Json,
    /// 紧凑格式
    Compact,
}

impl LogFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
            LogFormat::Compact => "compact",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        [LogFormat::Pretty, LogFormat::Json, LogFormat::Compact]
            .into_iter()
            .find(|format| format.as_str() == value)
    }
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 环境
    pub environment: LoggingEnvironment,
    /// 日志级别
    pub level: Level,
    /// 输出格式
    pub format: LogFormat,
    /// 是否显示目标模块
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::for_defaults(LoggingEnvironment::Development)
    }
}

impl LoggingConfig {
    /// 创建开发环境配置
    pub fn development() -> Self {
        Self::for_defaults(LoggingEnvironment::Development)
    }

    /// 创建生产环境配置
    pub fn production() -> Self {
        Self::for_defaults(LoggingEnvironment::Production)
    }

    /// 创建测试环境配置
    pub fn testing() -> Self {
        Self::for_defaults(LoggingEnvironment::Testing)
    }

    /// 从配置文件中的日志段构建（开发环境的输出细节）
    pub fn from_settings(settings: &LoggingSettings) -> Result<Self, AppError> {
        Self::for_environment(LoggingEnvironment::Development, settings)
    }

    /// 按环境决定输出细节，级别和格式取自日志段
    pub fn for_environment(
        environment: LoggingEnvironment,
        settings: &LoggingSettings,
    ) -> Result<Self, AppError> {
        let level = settings
            .level
            .parse::<Level>()
            .map_err(|e| AppError::Logging(format!("invalid level '{}': {}", settings.level, e)))?;
        let format = LogFormat::parse(&settings.format)
            .ok_or_else(|| AppError::Logging(format!("invalid format '{}'", settings.format)))?;

        Ok(Self::assemble(environment, level, format))
    }

    // 默认日志段总能解析；这里直接重用同一张默认值表
    fn for_defaults(environment: LoggingEnvironment) -> Self {
        let settings = environment.default_settings();
        let level = settings.level.parse::<Level>().unwrap_or(Level::INFO);
        let format = LogFormat::parse(&settings.format).unwrap_or(LogFormat::Pretty);
        Self::assemble(environment, level, format)
    }

    fn assemble(environment: LoggingEnvironment, level: Level, format: LogFormat) -> Self {
        Self {
            environment,
            level,
            format,
            show_target: environment != LoggingEnvironment::Production,
            show_thread_ids: environment == LoggingEnvironment::Development,
        }
    }
}

/// 初始化日志系统
///
/// `RUST_LOG` 存在时优先于配置中的级别；全局订阅者已存在时返回错误而不是 panic。
pub fn init_logging(config: LoggingConfig) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str().to_lowercase()));
    let ansi = config.environment != LoggingEnvironment::Production;

    let result = match config.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(config.show_target)
                    .with_thread_ids(config.show_thread_ids)
                    .with_ansi(ansi),
            )
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(config.show_target)
                    .with_thread_ids(config.show_thread_ids),
            )
            .try_init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .compact()
                    .with_target(config.show_target)
                    .with_thread_ids(config.show_thread_ids)
                    .with_ansi(ansi),
            )
            .try_init(),
    };
    result.map_err(|e| AppError::Logging(e.to_string()))?;

    tracing::info!(
        environment = ?config.environment,
        level = ?config.level,
        format = ?config.format,
        "Logging system initialized"
    );

    Ok(())
}

/// 操作计时器
///
/// `finish` 记录耗时；未调用 `finish` 就被丢弃（例如 future 被取消）时记录为中断。
pub struct OperationTimer {
    start: Instant,
    operation: &'static str,
    metadata: BTreeMap<&'static str, String>,
    finished: bool,
}

impl OperationTimer {
    /// 创建新的计时器
    pub fn new(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
            metadata: BTreeMap::new(),
            finished: false,
        }
    }

    /// 添加元数据
    pub fn with_metadata(mut self, key: &'static str, value: impl ToString) -> Self {
        self.metadata.insert(key, value.to_string());
        self
    }

    /// 完成计时并记录日志，返回耗时
    pub fn finish(mut self) -> Duration {
        self.finished = true;
        let duration = self.start.elapsed();

        tracing::debug!(
            operation = self.operation,
            duration_us = duration.as_micros() as u64,
            metadata = ?self.metadata,
            "Operation completed"
        );
        duration
    }

    /// 获取当前经过时间
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        tracing::debug!(
            operation = self.operation,
            duration_us = self.start.elapsed().as_micros() as u64,
            metadata = ?self.metadata,
            "Operation interrupted"
        );
    }
}
