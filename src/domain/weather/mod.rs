//! Weather domain - provider payloads, feature normalization, realtime records

mod normalize;
mod payload;
mod provider;
mod realtime;

pub use normalize::{normalize, normalize_full, WEATHERAPI_SOURCE_NAME};
pub use payload::{AirQuality, CurrentConditions, Location, WeatherPayload};
pub use provider::WeatherProvider;
pub use realtime::{
    AqiIndices, Availability, CurrentAirQuality, CurrentWeather, FeatureSnapshot, RealtimeRecord,
};

#[cfg(test)]
pub use provider::MockWeatherProvider;
