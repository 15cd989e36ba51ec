//! One-hour-ahead CO prediction for an allow-listed city

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, instrument, warn};

use crate::domain::{
    normalize, sanitize_inputs, sanitize_output, CityRegistry, DomainError, PredictionRequest,
    PredictionResult, RegressorSet, WeatherProvider,
};
use crate::infrastructure::forecast::{ContextAssembler, ModelCache, DEFAULT_CONTEXT_LENGTH};
use crate::infrastructure::observability::{record_prediction, record_provider_request};

/// File locations and window size used by every prediction
#[derive(Debug, Clone)]
pub struct PredictionServiceConfig {
    /// Persisted model artifact
    pub model_path: PathBuf,
    /// Dataset the warm-fit pass runs over
    pub train_data_path: PathBuf,
    /// Dataset the context window is cut from
    pub context_data_path: PathBuf,
    pub context_length: usize,
}

impl PredictionServiceConfig {
    pub fn new(
        model_path: impl Into<PathBuf>,
        train_data_path: impl Into<PathBuf>,
        context_data_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            model_path: model_path.into(),
            train_data_path: train_data_path.into(),
            context_data_path: context_data_path.into(),
            context_length: DEFAULT_CONTEXT_LENGTH,
        }
    }

    pub fn with_context_length(mut self, context_length: usize) -> Self {
        self.context_length = context_length;
        self
    }
}

/// Where the regressors of a prediction came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegressorSource {
    Request,
    Provider,
}

impl RegressorSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Provider => "provider",
        }
    }
}

/// Prediction service
pub struct PredictionService {
    cities: Arc<CityRegistry>,
    provider: Arc<dyn WeatherProvider>,
    models: ModelCache,
    assembler: ContextAssembler,
    config: PredictionServiceConfig,
}

impl fmt::Debug for PredictionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictionService")
            .field("cities", &self.cities.len())
            .field("provider", &self.provider.provider_name())
            .field("models", &self.models)
            .field("config", &self.config)
            .finish()
    }
}

impl PredictionService {
    pub fn new(
        cities: Arc<CityRegistry>,
        provider: Arc<dyn WeatherProvider>,
        models: ModelCache,
        assembler: ContextAssembler,
        config: PredictionServiceConfig,
    ) -> Self {
        Self {
            cities,
            provider,
            models,
            assembler,
            config,
        }
    }

    /// Bring the model to its warm state without predicting
    pub async fn ensure_ready(&self) -> Result<(), DomainError> {
        self.models
            .get_ready_model(&self.config.model_path, &self.config.train_data_path)
            .await
            .map(|_| ())
    }

    pub async fn is_ready(&self) -> bool {
        self.models
            .is_warm(&self.config.model_path, &self.config.train_data_path)
            .await
    }

    #[instrument(skip(self, request), fields(city = %request.city))]
    pub async fn predict(&self, request: PredictionRequest) -> Result<PredictionResult, DomainError> {
        let started = Instant::now();
        let city = self.cities.resolve(&request.city)?.clone();

        let (outcome, source) = match self.resolve_regressors(&request, &city.query).await {
            Ok((regressors, source)) => (self.forecast(&city.name, regressors).await, source),
            Err(e) => (Err(e), RegressorSource::Provider),
        };

        record_prediction(&city.name, source.as_str(), started.elapsed(), outcome.is_ok());

        match &outcome {
            Ok(result) => info!(
                city = %result.city,
                ds = %result.timestamp,
                yhat = result.value,
                "Prediction computed"
            ),
            Err(e) if e.is_model_failure() => {
                error!(error = %e, "Prediction failed on model assets")
            }
            Err(e) => warn!(error = %e, "Prediction failed"),
        }

        outcome
    }

    async fn resolve_regressors(
        &self,
        request: &PredictionRequest,
        query: &str,
    ) -> Result<(RegressorSet, RegressorSource), DomainError> {
        if let Some(regressors) = request.supplied_regressors() {
            return Ok((regressors, RegressorSource::Request));
        }

        debug!(query = %query, "Readings not supplied, querying provider");

        let started = Instant::now();
        let fetched = self.provider.fetch(query).await;
        record_provider_request(
            self.provider.provider_name(),
            started.elapsed(),
            fetched.is_ok(),
        );

        let regressors = normalize(&fetched?)?;
        Ok((regressors, RegressorSource::Provider))
    }

    async fn forecast(
        &self,
        city: &str,
        regressors: RegressorSet,
    ) -> Result<PredictionResult, DomainError> {
        let inputs = sanitize_inputs(&regressors);

        let model = self
            .models
            .get_ready_model(&self.config.model_path, &self.config.train_data_path)
            .await?;

        let assembler = self.assembler.clone();
        let context_path = self.config.context_data_path.clone();
        let context_length = self.config.context_length;

        let window = tokio::task::spawn_blocking(move || {
            assembler.build_context(&context_path, &inputs, context_length)
        })
        .await
        .map_err(|e| DomainError::internal(format!("context assembly task failed: {}", e)))??;

        let raw_value = model.predict(&window)?;

        if !raw_value.is_finite() {
            return Err(DomainError::internal(format!(
                "model '{}' produced a non-finite forecast",
                model.name()
            )));
        }

        Ok(PredictionResult {
            city: city.to_string(),
            timestamp: window.future().timestamp,
            value: sanitize_output(raw_value),
            inputs,
        })
    }
}
