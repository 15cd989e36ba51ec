//! Process-wide cache of warm forecasting models
//!
//! Entries are keyed by artifact identity. moka's `get_with` guarantees a
//! single initialization per key, and what it stores is a shared handle to
//! a spawned warm-up task: concurrent first callers wait on the same load
//! and warm-fit, and the outcome (success or failure) is memoized for the
//! life of the process.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use futures::future::{BoxFuture, FutureExt, Shared};
use moka::future::Cache as MokaCache;
use tracing::{error, info};

use super::reference::load_reference_rows;
use crate::domain::{DomainError, ForecastModel, ModelStore, RegressorSchema, WarmFitConfig};
use crate::infrastructure::observability::record_model_warmup;

/// Default maximum number of distinct models kept warm
pub const DEFAULT_CACHE_CAPACITY: u64 = 16;

/// Identity of a warm model: the artifact and the dataset it was fitted on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelCacheKey {
    pub model_path: PathBuf,
    pub reference_path: PathBuf,
}

impl ModelCacheKey {
    pub fn new(model_path: impl Into<PathBuf>, reference_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            reference_path: reference_path.into(),
        }
    }
}

type CachedModel = Result<Arc<dyn ForecastModel>, DomainError>;
type PendingModel = Shared<BoxFuture<'static, CachedModel>>;

/// Loads, warm-fits and memoizes models
#[derive(Clone)]
pub struct ModelCache {
    entries: MokaCache<ModelCacheKey, PendingModel>,
    store: Arc<dyn ModelStore>,
    schema: RegressorSchema,
    warm_fit: WarmFitConfig,
}

impl std::fmt::Debug for ModelCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelCache")
            .field("entries", &self.entries.entry_count())
            .field("store", &self.store)
            .field("warm_fit", &self.warm_fit)
            .finish()
    }
}

impl ModelCache {
    pub fn new(
        store: Arc<dyn ModelStore>,
        schema: RegressorSchema,
        warm_fit: WarmFitConfig,
        capacity: u64,
    ) -> Self {
        Self {
            entries: MokaCache::builder().max_capacity(capacity).build(),
            store,
            schema,
            warm_fit,
        }
    }

    /// Return the warm model for the given artifact and reference dataset,
    /// loading and warm-fitting it on first use.
    pub async fn get_ready_model(
        &self,
        model_path: &Path,
        reference_path: &Path,
    ) -> Result<Arc<dyn ForecastModel>, DomainError> {
        let key = ModelCacheKey::new(model_path, reference_path);
        let init_key = key.clone();

        let pending = self
            .entries
            .get_with(key, async { self.spawn_warmup(init_key) })
            .await;

        pending.await
    }

    /// Whether a successfully warmed model is cached for the key
    pub async fn is_warm(&self, model_path: &Path, reference_path: &Path) -> bool {
        let key = ModelCacheKey::new(model_path, reference_path);

        match self.entries.get(&key).await {
            Some(pending) => matches!(pending.peek(), Some(Ok(_))),
            None => false,
        }
    }

    /// Start the load and warm-fit on its own task. The task outlives any
    /// caller, so a dropped request never restarts the warm-up.
    fn spawn_warmup(&self, key: ModelCacheKey) -> PendingModel {
        let store = Arc::clone(&self.store);
        let schema = self.schema.clone();
        let warm_fit = self.warm_fit;

        let task = tokio::spawn(async move {
            let started = Instant::now();
            let model_label = key.model_path.display().to_string();

            let outcome = tokio::task::spawn_blocking(move || {
                build_ready_model(store.as_ref(), &schema, &warm_fit, &key)
            })
            .await
            .unwrap_or_else(|e| {
                Err(DomainError::internal(format!("model warm-up task failed: {}", e)))
            });

            record_model_warmup(&model_label, started.elapsed(), outcome.is_ok());

            match &outcome {
                Ok(model) => info!(
                    model = %model.name(),
                    path = %model_label,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Model is warm"
                ),
                Err(e) => error!(path = %model_label, error = %e, "Model warm-up failed"),
            }

            outcome
        });

        task.map(|joined| {
            joined.unwrap_or_else(|e| {
                Err(DomainError::internal(format!("model warm-up task failed: {}", e)))
            })
        })
        .boxed()
        .shared()
    }

    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }
}

fn build_ready_model(
    store: &dyn ModelStore,
    schema: &RegressorSchema,
    warm_fit: &WarmFitConfig,
    key: &ModelCacheKey,
) -> CachedModel {
    let mut model = store.load(&key.model_path)?;

    if !schema.matches(model.regressors()) {
        return Err(DomainError::model_load(
            key.model_path.display().to_string(),
            format!(
                "model regressors {:?} do not match configured columns {:?}",
                model.regressors(),
                schema.regressor_names()
            ),
        ));
    }

    let reference = load_reference_rows(&key.reference_path, schema)?;

    model
        .bring_to_ready_state(&reference, warm_fit)
        .map_err(|e| match e {
            DomainError::WarmFit { .. } => e,
            other => DomainError::warm_fit(other.to_string()),
        })?;

    if !model.is_ready() {
        return Err(DomainError::warm_fit(format!(
            "model '{}' is still cold after warm-fit",
            model.name()
        )));
    }

    Ok(Arc::from(model))
}
