//! Application state for shared services

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{DomainError, PredictionRequest, PredictionResult, RealtimeRecord};
use crate::infrastructure::services::{CityRealtime, PredictionService, RealtimeService};

#[cfg(test)]
use mockall::automock;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub prediction_service: Arc<dyn PredictionServiceTrait>,
    pub realtime_service: Arc<dyn RealtimeServiceTrait>,
}

impl AppState {
    pub fn new(
        prediction_service: Arc<dyn PredictionServiceTrait>,
        realtime_service: Arc<dyn RealtimeServiceTrait>,
    ) -> Self {
        Self {
            prediction_service,
            realtime_service,
        }
    }
}

/// Trait for prediction service operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PredictionServiceTrait: Send + Sync {
    async fn predict(&self, request: PredictionRequest) -> Result<PredictionResult, DomainError>;

    /// Load and warm-fit the model if that has not happened yet
    async fn ensure_ready(&self) -> Result<(), DomainError>;
}

/// Trait for realtime snapshot operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RealtimeServiceTrait: Send + Sync {
    async fn realtime(&self) -> Vec<CityRealtime>;

    async fn realtime_for(&self, city: String) -> Result<RealtimeRecord, DomainError>;
}

#[async_trait]
impl PredictionServiceTrait for PredictionService {
    async fn predict(&self, request: PredictionRequest) -> Result<PredictionResult, DomainError> {
        PredictionService::predict(self, request).await
    }

    async fn ensure_ready(&self) -> Result<(), DomainError> {
        PredictionService::ensure_ready(self).await
    }
}

#[async_trait]
impl RealtimeServiceTrait for RealtimeService {
    async fn realtime(&self) -> Vec<CityRealtime> {
        RealtimeService::realtime(self).await
    }

    async fn realtime_for(&self, city: String) -> Result<RealtimeRecord, DomainError> {
        RealtimeService::realtime_for(self, &city).await
    }
}
