//! Configuration management for Pilot
//!
//! Handles loading the application configuration from a TOML file in the
//! user's config directory, falling back to defaults when no file exists.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General application settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Dashboard settings
    #[serde(default)]
    pub ui: UiConfig,
    /// Backend settings
    #[serde(default)]
    pub backend: BackendConfig,
}

/// General application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level filter used when `RUST_LOG` is not set
    pub log_level: String,
    /// Directory for log files (defaults to the data directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

/// Dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Create the demo sessions on startup
    pub seed_demo_sessions: bool,
    /// Capture mouse events (click to focus, wheel to scroll)
    pub mouse: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            seed_demo_sessions: true,
            mouse: true,
        }
    }
}

/// Backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Artificial latency of the simulated backend, in milliseconds
    pub latency_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self { latency_ms: 400 }
    }
}

impl BackendConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

impl Config {
    /// Directory where log files are written
    pub fn log_dir(&self) -> PathBuf {
        self.general.log_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|p| p.join("pilot"))
                .unwrap_or_else(|| PathBuf::from(".pilot"))
                .join("logs")
        })
    }
}

/// Configuration manager for loading config
pub struct ConfigManager {
    config_path: PathBuf,
    config: Config,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Self::with_path(config_path)
    }

    /// Create a config manager with a specific path
    pub fn with_path(config_path: PathBuf) -> Result<Self> {
        let config = if config_path.exists() {
            Self::load_from_path(&config_path)?
        } else {
            Config::default()
        };

        Ok(Self { config_path, config })
    }

    /// Get the default config path
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not find config directory".to_string()))?;

        Ok(config_dir.join("pilot").join("config.toml"))
    }

    /// Load configuration from a file
    fn load_from_path(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)?;

        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Path the configuration was (or would be) loaded from
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Get the current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Consume the manager, keeping the configuration
    pub fn into_config(self) -> Config {
        self.config
    }
}
