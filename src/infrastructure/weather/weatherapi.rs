//! WeatherAPI.com current-conditions client

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::weather::WeatherProvider;
use crate::domain::{DomainError, WeatherPayload};

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

const PROVIDER_NAME: &str = "weatherapi";

/// Real provider client using reqwest
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherApiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                DomainError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn current_url(&self) -> String {
        format!("{}/v1/current.json", self.base_url)
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiClient {
    async fn fetch(&self, query: &str) -> Result<WeatherPayload, DomainError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            DomainError::provider(PROVIDER_NAME, "API key is not configured")
        })?;

        debug!(query = %query, "Fetching current conditions");

        let response = self
            .client
            .get(self.current_url())
            .query(&[("key", api_key), ("q", query), ("aqi", "yes")])
            .send()
            .await
            .map_err(|e| DomainError::provider(PROVIDER_NAME, format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(DomainError::provider(
                PROVIDER_NAME,
                format!("HTTP {}: {}", status, error_body),
            ));
        }

        response.json().await.map_err(|e| {
            DomainError::provider(PROVIDER_NAME, format!("Failed to parse response: {}", e))
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
