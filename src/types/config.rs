//! Configuration for metalca.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::MetalcaResult;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "metalca.toml";

/// Main configuration for metalca.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Score cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Predictor settings.
    #[serde(default)]
    pub predictor: PredictorConfig,

    /// Administrative surface settings.
    #[serde(default)]
    pub admin: AdminConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_true() -> bool {
    true
}

/// Eviction order used by the score cache when it is full.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EvictionPolicy {
    /// Oldest inserted entry leaves first; reads do not reorder.
    #[default]
    Fifo,
    /// Least recently read entry leaves first.
    Lru,
}

/// Score cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum number of entries.
    #[serde(default = "default_cache_max_size")]
    pub max_size: usize,

    /// Entry retention window in seconds.
    #[serde(default = "default_cache_max_age")]
    pub max_age_secs: u64,

    /// Interval between background sweeps in seconds.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Eviction order.
    #[serde(default)]
    pub eviction: EvictionPolicy,
}

impl CacheConfig {
    /// Retention window as a `Duration`.
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }

    /// Sweep interval as a `Duration`.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_size: default_cache_max_size(),
            max_age_secs: default_cache_max_age(),
            sweep_interval_secs: default_sweep_interval(),
            eviction: EvictionPolicy::default(),
        }
    }
}

fn default_cache_max_size() -> usize {
    100
}

fn default_cache_max_age() -> u64 {
    30 * 60 // 30 minutes
}

fn default_sweep_interval() -> u64 {
    15 * 60 // 15 minutes
}

/// Predictor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Delegate to the external model script instead of the heuristic.
    #[serde(default)]
    pub use_script: bool,

    /// Interpreter command.
    #[serde(default = "default_predictor_command")]
    pub command: String,

    /// Path of the prediction script.
    #[serde(default = "default_script_path")]
    pub script_path: PathBuf,

    /// Script timeout (in seconds).
    #[serde(default = "default_predictor_timeout")]
    pub timeout_secs: u64,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            use_script: false,
            command: default_predictor_command(),
            script_path: default_script_path(),
            timeout_secs: default_predictor_timeout(),
        }
    }
}

fn default_predictor_command() -> String {
    "python3".to_string()
}

fn default_script_path() -> PathBuf {
    PathBuf::from("ml_models/predict.py")
}

fn default_predictor_timeout() -> u64 {
    30
}

/// Administrative surface settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Token required by the cache administration tools. No token means open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl AdminConfig {
    /// Checks a presented token against the configured one.
    pub fn authorize(&self, presented: Option<&str>) -> bool {
        match &self.token {
            None => true,
            Some(expected) => presented == Some(expected.as_str()),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> MetalcaResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> MetalcaResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Creates default configuration.
    pub fn default_config() -> Self {
        Self {
            general: GeneralConfig::default(),
            cache: CacheConfig::default(),
            predictor: PredictorConfig::default(),
            admin: AdminConfig::default(),
        }
    }

    /// User-level configuration path (`<config dir>/metalca/metalca.toml`).
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("metalca").join(CONFIG_FILE_NAME))
    }

    /// Tries the current directory, then the user config directory, then defaults.
    pub fn load_or_default() -> Self {
        if let Ok(config) = Self::load(CONFIG_FILE_NAME) {
            return config;
        }

        Self::user_config_path()
            .and_then(|path| Self::load(path).ok())
            .unwrap_or_else(Self::default_config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
