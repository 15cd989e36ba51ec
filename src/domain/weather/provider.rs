use async_trait::async_trait;

use super::WeatherPayload;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Source of current weather and air quality readings.
///
/// `query` is a city name or a `"lat,lon"` pair. Implementations apply
/// their own timeout and report every failure as [`DomainError::Provider`].
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn fetch(&self, query: &str) -> Result<WeatherPayload, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
