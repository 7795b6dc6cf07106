//! Configuration management for Lumen.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides. Every recognized option has its default
//! stated here; callers resolve per-request overrides against these values
//! once, at the entry point of an analysis.

use crate::error::{ConfigError, ConfigResult};
use crate::types::{ContrastMetric, Tool, WcagLevel};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration.
///
/// This is loaded from `~/.config/lumen/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Multi-engine aggregation settings
    pub aggregator: AggregatorConfig,
    /// Contrast analysis settings
    pub contrast: ContrastConfig,
    /// Headless browser settings
    pub browser: BrowserConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from the default path, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, falling back to defaults if missing.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            let contents = fs::read_to_string(path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `LUMEN_WCAG_LEVEL`: Override the target conformance level (A/AA/AAA)
    /// - `LUMEN_HEADLESS`: Override browser headless mode (true/false)
    /// - `LUMEN_CONTRAST_METRIC`: Override the contrast metric (wcag/apca)
    pub fn load_with_env(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };
        config.apply_env();
        Ok(config)
    }

    /// Apply environment overrides to an already-loaded configuration.
    pub fn apply_env(&mut self) {
        if let Ok(val) = std::env::var("LUMEN_WCAG_LEVEL") {
            if let Ok(level) = val.parse::<WcagLevel>() {
                self.aggregator.wcag_level = level;
                self.contrast.level = level;
                tracing::debug!("Override wcag_level from env: {}", level);
            }
        }

        if let Ok(val) = std::env::var("LUMEN_HEADLESS") {
            if let Ok(headless) = val.parse() {
                self.browser.headless = headless;
                tracing::debug!("Override browser.headless from env: {}", headless);
            }
        }

        if let Ok(val) = std::env::var("LUMEN_CONTRAST_METRIC") {
            if let Ok(metric) = val.parse::<ContrastMetric>() {
                self.contrast.metric = metric;
                tracing::debug!("Override contrast.metric from env: {:?}", metric);
            }
        }
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/lumen/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("dev", "lumen", "lumen").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Multi-engine aggregation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Engines to run when a request does not name any
    pub default_tools: Vec<Tool>,
    /// Conformance level passed to engines when a request does not set one
    pub wcag_level: WcagLevel,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            default_tools: Tool::ALL.to_vec(),
            wcag_level: WcagLevel::AA,
        }
    }
}

/// Contrast analysis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContrastConfig {
    /// Metric used to decide pass/fail
    pub metric: ContrastMetric,
    /// Conformance level for WCAG ratios (A is evaluated as AA)
    pub level: WcagLevel,
    /// Whether failing samples get a suggested replacement color
    pub suggest_fixes: bool,
}

impl Default for ContrastConfig {
    fn default() -> Self {
        Self {
            metric: ContrastMetric::Wcag,
            level: WcagLevel::AA,
            suggest_fixes: true,
        }
    }
}

/// Browser automation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// Navigation timeout in seconds
    pub navigation_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1280,
            window_height: 800,
            navigation_timeout_secs: 30,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,lumen=debug".to_string(),
        }
    }
}
