//! Configuration file support.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/intake/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub weather: WeatherConfig,

    #[serde(default)]
    pub food: FoodConfig,

    #[serde(default)]
    pub reset: ResetConfig,
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

/// Weather lookup configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key; the WEATHER_API_KEY environment variable
    /// takes over when unset here
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_weather_base_url")]
    pub base_url: String,

    #[serde(default = "default_lookup_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            timeout_secs: default_lookup_timeout_secs(),
        }
    }
}

/// Food lookup configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FoodConfig {
    #[serde(default = "default_food_base_url")]
    pub base_url: String,

    #[serde(default = "default_lookup_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_food_page_size")]
    pub page_size: u32,
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            base_url: default_food_base_url(),
            timeout_secs: default_lookup_timeout_secs(),
            page_size: default_food_page_size(),
        }
    }
}

/// Daily reset configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResetConfig {
    /// Local-time hour (0-23) the daily reset fires at
    #[serde(default = "default_reset_hour")]
    pub hour: u32,
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            hour: default_reset_hour(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("intake")
}

fn default_weather_base_url() -> String {
    "http://api.openweathermap.org".into()
}

fn default_food_base_url() -> String {
    "https://world.openfoodfacts.org".into()
}

fn default_lookup_timeout_secs() -> u64 {
    10
}

fn default_food_page_size() -> u32 {
    10
}

fn default_reset_hour() -> u32 {
    0
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
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

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("intake").join("config.toml")
    }

    fn validate(&self) -> Result<()> {
        if self.reset.hour > 23 {
            return Err(Error::Config(format!(
                "reset.hour must be between 0 and 23, got {}",
                self.reset.hour
            )));
        }
        if self.food.page_size == 0 {
            return Err(Error::Config("food.page_size must be above 0".into()));
        }
        Ok(())
    }

    /// Weather API key from the config file or the environment
    pub fn weather_api_key(&self) -> Option<String> {
        self.weather
            .api_key
            .clone()
            .or_else(|| std::env::var("WEATHER_API_KEY").ok())
            .filter(|key| !key.is_empty())
    }

    pub fn weather_timeout(&self) -> Duration {
        Duration::from_secs(self.weather.timeout_secs)
    }

    pub fn food_timeout(&self) -> Duration {
        Duration::from_secs(self.food.timeout_secs)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
