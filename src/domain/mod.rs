//! Domain layer - Core business logic and entities

pub mod city;
pub mod error;
pub mod forecast;
pub mod weather;

pub use city::{default_cities, City, CityRegistry};
pub use error::DomainError;
pub use forecast::{
    sanitize_inputs, sanitize_output, AnchorStrategy, ContextWindow, ForecastModel, ModelStore,
    Observation, PredictionRequest, PredictionResult, RegressorSchema, RegressorSet,
    WarmFitConfig,
};
pub use weather::{normalize, normalize_full, RealtimeRecord, WeatherPayload, WeatherProvider};
