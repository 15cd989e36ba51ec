//! Air Quality CO Predictor
//!
//! One-hour-ahead carbon monoxide forecasts for a small allow-list of
//! cities:
//! - Pre-trained lagged regression model, warm-fitted once per process
//! - Context window cut from a frozen reference dataset
//! - Live temperature, humidity and NO2 from WeatherAPI when the caller
//!   supplies none
//! - Realtime air quality and weather snapshots

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::{info, warn};

use api::state::AppState;
use domain::{CityRegistry, WeatherProvider};
use infrastructure::{
    forecast::{ContextAssembler, JsonModelStore, ModelCache},
    services::{PredictionService, PredictionServiceConfig, RealtimeService},
    weather::WeatherApiClient,
};

/// Build the WeatherAPI client from configuration
pub fn create_weather_provider(config: &AppConfig) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let client = WeatherApiClient::new(
        config.weather.base_url.clone(),
        config.weather.api_key.clone(),
        config.weather.timeout(),
    )?;

    if !client.has_api_key() {
        warn!(
            "No WeatherAPI key configured; set {} or weather.api_key. \
             Requests without temperature and humidity will fail.",
            config::WEATHER_API_KEY_ENV
        );
    }

    Ok(Arc::new(client))
}

/// Build the prediction service around the given provider
pub fn create_prediction_service(
    config: &AppConfig,
    cities: Arc<CityRegistry>,
    provider: Arc<dyn WeatherProvider>,
) -> anyhow::Result<PredictionService> {
    let forecast = &config.forecast;

    let models = ModelCache::new(
        Arc::new(JsonModelStore::new()),
        forecast.schema.clone(),
        forecast.warm_fit,
        forecast.cache_capacity,
    );

    let assembler = ContextAssembler::with_timezone_name(
        forecast.schema.clone(),
        forecast.anchor,
        &forecast.reference_timezone,
    )?;

    let service_config = PredictionServiceConfig::new(
        &forecast.model_path,
        &forecast.train_data_path,
        &forecast.context_data_path,
    )
    .with_context_length(forecast.context_length);

    info!(
        model = %forecast.model_path.display(),
        train_data = %forecast.train_data_path.display(),
        context_data = %forecast.context_data_path.display(),
        context_length = forecast.context_length,
        anchor = ?forecast.anchor,
        "Prediction service configured"
    );

    Ok(PredictionService::new(
        cities,
        provider,
        models,
        assembler,
        service_config,
    ))
}

/// Create application state from the loaded configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let provider = create_weather_provider(config)?;
    create_app_state_with_provider(config, provider)
}

/// Create application state with an explicit weather provider
pub fn create_app_state_with_provider(
    config: &AppConfig,
    provider: Arc<dyn WeatherProvider>,
) -> anyhow::Result<AppState> {
    if config.cities.is_empty() {
        anyhow::bail!("At least one city must be configured");
    }

    let cities = Arc::new(CityRegistry::new(config.cities.clone()));

    let prediction_service =
        create_prediction_service(config, Arc::clone(&cities), Arc::clone(&provider))?;
    let realtime_service = RealtimeService::new(cities, provider);

    Ok(AppState::new(
        Arc::new(prediction_service),
        Arc::new(realtime_service),
    ))
}
