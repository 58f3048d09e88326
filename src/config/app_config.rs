use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::errors::ConfigError;

// Configuration location constants
pub const USER_CONFIG_DIR: &str = "capscope";
pub const CONFIG_FILE_NAME: &str = "config.toml";

// Environment overrides
pub const ENV_LOG_LEVEL: &str = "CAPSCOPE_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "CAPSCOPE_LOG_FORMAT";
pub const ENV_AGENT_URL: &str = "CAPSCOPE_AGENT_URL";
pub const ENV_AGENT_NAME: &str = "CAPSCOPE_AGENT_NAME";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 3] = ["pretty", "json", "compact"];

/// Main Application Configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppConfig {
    pub logging: LoggingSettings,
    pub agent: AgentClientConfig,
}

/// Logging section of the configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggingSettings {
    pub level: String,
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Defaults applied to agent calls when the caller leaves them unset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentClientConfig {
    /// Used when a call does not name a URL
    pub default_url: Option<String>,
    /// Used when a call does not name an agent; the server picks otherwise
    pub default_agent: Option<String>,
    /// Headers added to every call
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

/// Partial Application Configuration for loading from files
#[derive(Deserialize, Debug, Default)]
pub struct PartialAppConfig {
    logging: Option<PartialLoggingSettings>,
    agent: Option<PartialAgentClientConfig>,
}

#[derive(Deserialize, Debug, Default)]
pub struct PartialLoggingSettings {
    level: Option<String>,
    format: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct PartialAgentClientConfig {
    default_url: Option<String>,
    default_agent: Option<String>,
    headers: Option<BTreeMap<String, String>>,
}

impl AppConfig {
    /// Merge file values with environment overrides; environment wins.
    pub fn from_partial_and_env(
        partial: PartialAppConfig,
        env_map: HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let defaults = LoggingSettings::default();
        let partial_logging = partial.logging.unwrap_or_default();
        let partial_agent = partial.agent.unwrap_or_default();

        let logging = LoggingSettings {
            level: env_map
                .get(ENV_LOG_LEVEL)
                .cloned()
                .or(partial_logging.level)
                .unwrap_or(defaults.level)
                .to_lowercase(),
            format: env_map
                .get(ENV_LOG_FORMAT)
                .cloned()
                .or(partial_logging.format)
                .unwrap_or(defaults.format)
                .to_lowercase(),
        };

        let agent = AgentClientConfig {
            default_url: env_map.get(ENV_AGENT_URL).cloned().or(partial_agent.default_url),
            default_agent: env_map
                .get(ENV_AGENT_NAME)
                .cloned()
                .or(partial_agent.default_agent),
            headers: partial_agent.headers.unwrap_or_default(),
        };

        let config = Self { logging, agent };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "logging.level must be one of {:?}, got '{}'",
                LOG_LEVELS, self.logging.level
            )));
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "logging.format must be one of {:?}, got '{}'",
                LOG_FORMATS, self.logging.format
            )));
        }
        if let Some(url) = &self.agent.default_url {
            if url.trim().is_empty() {
                return Err(ConfigError::Invalid("agent.default_url is empty".to_string()));
            }
        }
        Ok(())
    }
}
