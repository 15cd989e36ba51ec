//! API request, response and error types

pub mod error;
pub mod json;
pub mod predict;

pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
pub use predict::{PredictBody, PredictResponse, RealtimeResponse};
