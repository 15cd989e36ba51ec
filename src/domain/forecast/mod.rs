//! Forecast domain - regressors, context windows, model handle, post-processing

mod model;
mod postprocess;
mod prediction;
mod regressor;
mod window;

pub use model::{ForecastModel, ModelStore, WarmFitConfig};
pub use postprocess::{
    sanitize_inputs, sanitize_output, FORECAST_RANGE, HUMIDITY_RANGE, TEMPERATURE_RANGE,
    TRACE_GAS_RANGE,
};
pub use prediction::{PredictionRequest, PredictionResult};
pub use regressor::{RegressorSchema, RegressorSet};
pub use window::{is_hour_aligned, AnchorStrategy, ContextWindow, Observation};
