//! Configuration management for Hardline components

use hardline_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Policy file settings
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Rollback journal settings
    #[serde(default)]
    pub journal: JournalConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::Configuration(format!("Failed to parse config: {}", e)))
    }

    /// Merge with environment variables (HARDLINE_ prefix)
    pub fn merge_env(mut self) -> Self {
        if let Ok(val) = std::env::var("HARDLINE_POLICY_DIR") {
            self.policy.dir = val;
        }
        if let Ok(val) = std::env::var("HARDLINE_POLICY_FILE") {
            self.policy.file = Some(val);
        }
        if let Ok(val) = std::env::var("HARDLINE_JOURNAL_PATH") {
            self.journal.path = val;
        }
        if let Ok(val) = std::env::var("HARDLINE_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("HARDLINE_LOG_FORMAT") {
            self.logging.format = val;
        }
        self
    }
}

/// Policy file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Directory holding the annexure policy files
    #[serde(default = "default_policy_dir")]
    pub dir: String,

    /// Explicit policy file overriding platform selection
    pub file: Option<String>,
}

fn default_policy_dir() -> String {
    String::from("policies")
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            dir: default_policy_dir(),
            file: None,
        }
    }
}

/// Rollback journal configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalConfig {
    /// Path to the journal database file
    #[serde(default = "default_journal_path")]
    pub path: String,
}

fn default_journal_path() -> String {
    String::from("hardening.db")
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            path: default_journal_path(),
        }
    }
}

/// Logging configuration (file-level; translated to LogConfig at startup)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// pretty, compact or json
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    String::from("info")
}

fn default_log_format() -> String {
    String::from("pretty")
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
