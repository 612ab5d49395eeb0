//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/logmend/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/logmend/` (~/.config/logmend/)
//! - State/Logs: `$XDG_STATE_HOME/logmend/` (~/.local/state/logmend/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// Repository scan configuration
    #[serde(default)]
    pub scan: ScanConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Repository scan configuration for the source locator
#[derive(Debug, Deserialize, Clone)]
pub struct ScanConfig {
    /// File extensions considered source files during content scans
    #[serde(default = "default_source_extensions")]
    pub source_extensions: Vec<String>,

    /// Directory names skipped during tree walks
    #[serde(default = "default_skip_dirs")]
    pub skip_dirs: Vec<String>,

    /// Files larger than this are skipped during content scans
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            source_extensions: default_source_extensions(),
            skip_dirs: default_skip_dirs(),
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

fn default_source_extensions() -> Vec<String> {
    vec!["py".to_string()]
}

fn default_skip_dirs() -> Vec<String> {
    [".git", ".venv", "venv", "__pycache__", "node_modules", "target"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_max_file_bytes() -> u64 {
    1024 * 1024
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Path to the config file
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("logmend").join("config.toml")
    }

    /// Directory for log files
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("logmend")
    }

    /// Path to the log file
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("logmend.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.scan.source_extensions, vec!["py"]);
        assert!(config.scan.skip_dirs.contains(&".git".to_string()));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_str = r#"
            [scan]
            source_extensions = ["py", "pyi"]
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.scan.source_extensions, vec!["py", "pyi"]);
        // Unspecified fields fall back to defaults
        assert_eq!(config.scan.max_file_bytes, 1024 * 1024);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_paths() {
        assert!(Config::config_path().ends_with("logmend/config.toml"));
        assert!(Config::log_path().ends_with("logmend.log"));
    }
}
