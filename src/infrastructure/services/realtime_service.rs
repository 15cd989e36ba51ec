//! Current air quality and weather snapshots for the allow-listed cities

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use serde::Serialize;
use tracing::{instrument, warn};

use crate::domain::{normalize_full, City, CityRegistry, DomainError, RealtimeRecord, WeatherProvider};
use crate::infrastructure::observability::record_provider_request;

/// Realtime entry for one city: the record, or why it could not be fetched
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CityRealtime {
    Available(RealtimeRecord),
    Unavailable { city: String, error: String },
}

impl CityRealtime {
    pub fn city(&self) -> &str {
        match self {
            Self::Available(record) => &record.city,
            Self::Unavailable { city, .. } => city,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

pub struct RealtimeService {
    cities: Arc<CityRegistry>,
    provider: Arc<dyn WeatherProvider>,
}

impl fmt::Debug for RealtimeService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RealtimeService")
            .field("cities", &self.cities.len())
            .field("provider", &self.provider.provider_name())
            .finish()
    }
}

impl RealtimeService {
    pub fn new(cities: Arc<CityRegistry>, provider: Arc<dyn WeatherProvider>) -> Self {
        Self { cities, provider }
    }

    /// Fetch every allow-listed city concurrently, in allow-list order.
    /// A failing city yields an `Unavailable` entry.
    #[instrument(skip(self))]
    pub async fn realtime(&self) -> Vec<CityRealtime> {
        let fetches = self.cities.iter().map(|city| async move {
            match self.fetch_city(city).await {
                Ok(record) => CityRealtime::Available(record),
                Err(e) => {
                    warn!(city = %city.name, error = %e, "Realtime fetch failed");
                    CityRealtime::Unavailable {
                        city: city.name.clone(),
                        error: e.to_string(),
                    }
                }
            }
        });

        join_all(fetches).await
    }

    /// Fetch one allow-listed city
    pub async fn realtime_for(&self, city: &str) -> Result<RealtimeRecord, DomainError> {
        let city = self.cities.resolve(city)?;
        self.fetch_city(city).await
    }

    async fn fetch_city(&self, city: &City) -> Result<RealtimeRecord, DomainError> {
        let started = Instant::now();
        let fetched = self.provider.fetch(&city.query).await;

        record_provider_request(
            self.provider.provider_name(),
            started.elapsed(),
            fetched.is_ok(),
        );

        Ok(normalize_full(&fetched?, &city.name))
    }
}
