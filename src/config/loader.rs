use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf},
};

use crate::errors::ConfigError;

use super::app_config::{
    AppConfig, PartialAppConfig, CONFIG_FILE_NAME, ENV_AGENT_NAME, ENV_AGENT_URL, ENV_LOG_FORMAT,
    ENV_LOG_LEVEL, USER_CONFIG_DIR,
};

/// Configuration loader responsible for loading config from files and environment
pub struct ConfigLoader {
    base_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default paths
    pub fn new() -> Self {
        Self { base_path: None }
    }

    /// Create a config loader with custom base path (for testing)
    pub fn with_base_path(base_path: PathBuf) -> Self {
        Self {
            base_path: Some(base_path),
        }
    }

    /// Load complete application configuration
    pub fn load_config(&self) -> Result<AppConfig, ConfigError> {
        let config_path = self.config_path()?;
        let partial_config = self.load_partial_config(&config_path)?;
        let env_map = self.collect_env_vars();

        AppConfig::from_partial_and_env(partial_config, env_map)
    }

    /// Location of the configuration file
    pub fn config_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.base_path {
            Some(base_path) => Ok(base_path.join(CONFIG_FILE_NAME)),
            None => dirs::config_dir()
                .map(|dir| dir.join(USER_CONFIG_DIR).join(CONFIG_FILE_NAME))
                .ok_or_else(|| {
                    ConfigError::Other("Cannot determine user config directory".to_string())
                }),
        }
    }

    /// A missing file is not an error: defaults apply
    fn load_partial_config(&self, config_path: &Path) -> Result<PartialAppConfig, ConfigError> {
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "Config file not found, using defaults");
            return Ok(PartialAppConfig::default());
        }

        let content = fs::read_to_string(config_path)
            .map_err(|e| ConfigError::FileRead(config_path.display().to_string(), e))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", config_path.display(), e)))
    }

    fn collect_env_vars(&self) -> HashMap<String, String> {
        [ENV_LOG_LEVEL, ENV_LOG_FORMAT, ENV_AGENT_URL, ENV_AGENT_NAME]
            .iter()
            .filter_map(|key| env::var(key).ok().map(|value| (key.to_string(), value)))
            .collect()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
