//! Forecasting infrastructure: reference data, model artifacts, warm cache

mod context;
mod lagged_regression;
mod model_cache;
mod reference;
mod scaler;

#[cfg(test)]
pub(crate) mod test_support;

pub use context::{ContextAssembler, DEFAULT_CONTEXT_LENGTH, DEFAULT_REFERENCE_TIMEZONE};
pub use lagged_regression::{JsonModelStore, LaggedRegressionModel};
pub use model_cache::{ModelCache, ModelCacheKey, DEFAULT_CACHE_CAPACITY};
pub use reference::{load_reference_rows, parse_timestamp};
pub use scaler::StandardScaler;
