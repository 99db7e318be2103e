//! Configuration file support for medstock.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/medstock/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the push-notification access token
pub const ACCESS_TOKEN_ENV: &str = "PUSHBULLET_API_KEY";

/// Default push endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.pushbullet.com/v2/pushes";

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub notify: NotifyConfig,

    #[serde(default)]
    pub forecast: ForecastConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Push notification configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Access token; the environment variable takes precedence when set.
    #[serde(default)]
    pub access_token: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            access_token: None,
            timeout_secs: default_timeout_secs(),
            enabled: default_enabled(),
        }
    }
}

impl NotifyConfig {
    /// Pick the access token, preferring the environment over the file.
    ///
    /// Blank values on either side count as unset.
    pub fn resolve_token(&self, env_value: Option<String>) -> Option<String> {
        env_value
            .filter(|t| !t.trim().is_empty())
            .or_else(|| {
                self.access_token
                    .clone()
                    .filter(|t| !t.trim().is_empty())
            })
    }
}

/// Depletion forecast parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// How many days before running out the purchase should happen
    #[serde(default = "default_buy_lead_days")]
    pub buy_lead_days: u32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            buy_lead_days: default_buy_lead_days(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        PathBuf::from(home).join(".local/share")
    });
    base.join("medstock")
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.into()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_enabled() -> bool {
    true
}

fn default_buy_lead_days() -> u32 {
    10
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject settings the notifier cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.notify.enabled && self.notify.endpoint.trim().is_empty() {
            return Err(Error::Config("notify.endpoint must not be empty".into()));
        }
        if self.notify.timeout_secs == 0 {
            return Err(Error::Config("notify.timeout_secs must be at least 1".into()));
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
        base.join("medstock").join("config.toml")
    }
}
