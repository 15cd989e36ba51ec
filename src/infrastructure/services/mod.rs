//! Infrastructure services

mod prediction_service;
mod realtime_service;

pub use prediction_service::{PredictionService, PredictionServiceConfig, RegressorSource};
pub use realtime_service::{CityRealtime, RealtimeService};
