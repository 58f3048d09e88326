pub mod app_config;
pub mod loader;

// Re-export commonly used types
pub use app_config::{AgentClientConfig, AppConfig, LoggingSettings};
pub use loader::ConfigLoader;

// Re-export constants
pub use app_config::{
    CONFIG_FILE_NAME, ENV_AGENT_NAME, ENV_AGENT_URL, ENV_LOG_FORMAT, ENV_LOG_LEVEL,
};
