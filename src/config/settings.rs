use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::security::sensitive::{DEFAULT_EXEMPT_SUFFIXES, DEFAULT_MARKER};

/// Environment variable that points the hook at an alternate config file
pub const CONFIG_PATH_ENV: &str = "HOOKGATE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Config directory not found")]
    DirectoryNotFound,

    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub policy: PolicyConfig,
    pub allowlist: AllowlistConfig,
    pub sensitive: SensitiveConfig,
    pub audit: AuditConfig,
}

/// What to do with a piped command that uses an unknown or dangerous program
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PipePolicy {
    /// Ask the operator for confirmation
    Ask,
    /// Refuse outright. Unattended callers cannot answer a prompt.
    #[default]
    Deny,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct PolicyConfig {
    pub pipe_policy: PipePolicy,
    /// Deny raw `grep`/`find` in favor of `rg`/`fd` and the built-in search tools
    pub enforce_search_tools: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct AllowlistConfig {
    /// Overrides `~/.claude/safe`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SensitiveConfig {
    pub marker: String,
    pub exempt_suffixes: Vec<String>,
}

impl Default for SensitiveConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            exempt_suffixes: DEFAULT_EXEMPT_SUFFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct AuditConfig {
    pub enabled: bool,
    /// Overrides `~/.config/hookgate/decisions.log`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        Ok(home_dir()?.join(".config").join("hookgate"))
    }

    /// Get the config file path, honoring `HOOKGATE_CONFIG`
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            if !path.is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default location
    ///
    /// A missing file is not an error: the hook runs on defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default_config());
        }

        Self::load_from(&path)
    }

    /// Load and validate configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;

        config.validate()?;

        Ok(config)
    }

    /// Create default configuration
    pub fn default_config() -> Self {
        Config {
            policy: PolicyConfig::default(),
            allowlist: AllowlistConfig::default(),
            sensitive: SensitiveConfig::default(),
            audit: AuditConfig::default(),
        }
    }

    /// Path of the safe-command allowlist
    pub fn allowlist_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.allowlist.path {
            Some(path) => Ok(path.clone()),
            None => Ok(home_dir()?.join(".claude").join("safe")),
        }
    }

    /// Path of the decision audit log
    pub fn audit_log_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.audit.path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join("decisions.log")),
        }
    }

    /// Validate configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        if self.sensitive.marker.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "sensitive.marker must not be empty".to_string(),
            ));
        }

        for suffix in &self.sensitive.exempt_suffixes {
            if !suffix.starts_with(&self.sensitive.marker) {
                return Err(ConfigError::InvalidValue(format!(
                    "Exempt suffix '{}' does not start with the marker '{}'",
                    suffix, self.sensitive.marker
                )));
            }
        }

        if matches!(&self.allowlist.path, Some(p) if p.as_os_str().is_empty()) {
            return Err(ConfigError::InvalidValue(
                "allowlist.path must not be empty".to_string(),
            ));
        }

        if matches!(&self.audit.path, Some(p) if p.as_os_str().is_empty()) {
            return Err(ConfigError::InvalidValue(
                "audit.path must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn home_dir() -> Result<PathBuf, ConfigError> {
    std::env::var("HOME")
        .map(PathBuf::from)
        .map_err(|_| ConfigError::DirectoryNotFound)
}
