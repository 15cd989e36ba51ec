//! Weather provider implementations

mod weatherapi;

pub use weatherapi::{WeatherApiClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
