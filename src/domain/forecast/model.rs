//! Forecasting model handle and its persisted-artifact store

use std::fmt::Debug;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ContextWindow, Observation};
use crate::domain::DomainError;

/// Parameters of the one-time fitting pass that restores a deserialized
/// model's internal state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarmFitConfig {
    pub epochs: usize,
    pub learning_rate: f64,
}

impl Default for WarmFitConfig {
    fn default() -> Self {
        Self {
            epochs: 1,
            learning_rate: 1e-2,
        }
    }
}

/// A pre-trained one-step-ahead forecasting model.
///
/// A freshly deserialized model is cold: it must go through
/// [`ForecastModel::bring_to_ready_state`] once before it can predict.
pub trait ForecastModel: Send + Sync + Debug {
    /// Returns the model's name
    fn name(&self) -> &str;

    /// Regressor columns the model was trained on, in order
    fn regressors(&self) -> &[String];

    /// Whether the warm-fit pass has completed
    fn is_ready(&self) -> bool;

    /// Run the bounded fitting pass over the cleaned reference rows
    fn bring_to_ready_state(
        &mut self,
        reference: &[Observation],
        config: &WarmFitConfig,
    ) -> Result<(), DomainError>;

    /// Predict the target for the window's future row
    fn predict(&self, window: &ContextWindow) -> Result<f64, DomainError>;
}

/// Loads persisted model artifacts
pub trait ModelStore: Send + Sync + Debug {
    fn load(&self, path: &Path) -> Result<Box<dyn ForecastModel>, DomainError>;
}
