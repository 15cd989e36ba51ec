use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::{default_cities, AnchorStrategy, City, RegressorSchema, WarmFitConfig};
use crate::infrastructure::forecast::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_CONTEXT_LENGTH, DEFAULT_REFERENCE_TIMEZONE,
};
use crate::infrastructure::observability::ObservabilityConfig;
use crate::infrastructure::weather::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

/// Environment variable holding the provider key when the config has none
pub const WEATHER_API_KEY_ENV: &str = "WEATHER_API_KEY";

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub observability: ObservabilityConfig,
    pub forecast: ForecastConfig,
    pub weather: WeatherConfig,
    pub cities: Vec<City>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Model artifact, datasets and window assembly
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub model_path: PathBuf,
    /// Dataset the warm-fit pass runs over
    pub train_data_path: PathBuf,
    /// Dataset the context window is cut from
    pub context_data_path: PathBuf,
    pub context_length: usize,
    pub anchor: AnchorStrategy,
    /// IANA time zone used to find "now" under clock anchoring
    pub reference_timezone: String,
    pub warm_fit: WarmFitConfig,
    pub cache_capacity: u64,
    pub schema: RegressorSchema,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl WeatherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            observability: ObservabilityConfig::default(),
            forecast: ForecastConfig::default(),
            weather: WeatherConfig::default(),
            cities: default_cities(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/co_lagged_regression.json"),
            train_data_path: PathBuf::from("models/train_df_deploy.csv"),
            context_data_path: PathBuf::from("models/airquality_fallback.csv"),
            context_length: DEFAULT_CONTEXT_LENGTH,
            anchor: AnchorStrategy::default(),
            reference_timezone: DEFAULT_REFERENCE_TIMEZONE.to_string(),
            warm_fit: WarmFitConfig::default(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            schema: RegressorSchema::default(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl AppConfig {
    /// Layered load: `config/default`, `config/local`, then `APP__*`
    /// environment variables. The provider key falls back to
    /// `WEATHER_API_KEY`.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;
        app_config.apply_api_key_fallback(std::env::var(WEATHER_API_KEY_ENV).ok());

        Ok(app_config)
    }

    fn apply_api_key_fallback(&mut self, env_key: Option<String>) {
        let configured = self
            .weather
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty());

        if !configured {
            self.weather.api_key = env_key.filter(|key| !key.trim().is_empty());
        }
    }
}
