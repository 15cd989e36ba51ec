//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, ForecastConfig, LogFormat, LoggingConfig, ServerConfig, WeatherConfig,
    WEATHER_API_KEY_ENV,
};
