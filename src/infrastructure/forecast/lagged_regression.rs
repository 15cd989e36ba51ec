//! Lagged linear regression model over the CO series and its regressors
//!
//! The persisted artifact carries the learned weights only. The scaling
//! statistics the weights were learned against are not serialized, so a
//! freshly loaded model must be warm-fitted before it can predict.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::scaler::StandardScaler;
use crate::domain::{
    ContextWindow, DomainError, ForecastModel, ModelStore, Observation, WarmFitConfig,
};

const HOURLY: &str = "h";

fn default_model_name() -> String {
    "lagged-regression".to_string()
}

/// Scaling statistics restored by the warm-fit pass
#[derive(Debug, Clone)]
struct FittedState {
    target: StandardScaler,
    regressors: Vec<StandardScaler>,
}

/// One-step-ahead model in standardized space:
///
/// `z(t) = bias + Σ ar[k]·z_y(t-1-k) + Σ w[j]·z_xj(t)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaggedRegressionModel {
    #[serde(default = "default_model_name")]
    name: String,
    frequency: String,
    n_lags: usize,
    regressors: Vec<String>,
    /// `ar_weights[0]` applies to the most recent lag
    ar_weights: Vec<f64>,
    regressor_weights: Vec<f64>,
    #[serde(default)]
    bias: f64,
    #[serde(skip)]
    fitted: Option<FittedState>,
}

impl LaggedRegressionModel {
    /// Check that the artifact is internally consistent
    pub fn validate(&self) -> Result<(), String> {
        if !self.frequency.eq_ignore_ascii_case(HOURLY) {
            return Err(format!(
                "unsupported frequency '{}', expected '{}'",
                self.frequency, HOURLY
            ));
        }

        if self.n_lags == 0 {
            return Err("n_lags must be at least 1".to_string());
        }

        if self.ar_weights.len() != self.n_lags {
            return Err(format!(
                "expected {} autoregressive weights, found {}",
                self.n_lags,
                self.ar_weights.len()
            ));
        }

        if self.regressors.len() != 3 || self.regressor_weights.len() != self.regressors.len() {
            return Err(format!(
                "expected 3 regressors with one weight each, found {} regressors and {} weights",
                self.regressors.len(),
                self.regressor_weights.len()
            ));
        }

        let weights_finite = self
            .ar_weights
            .iter()
            .chain(&self.regressor_weights)
            .chain(std::iter::once(&self.bias))
            .all(|w| w.is_finite());

        if !weights_finite {
            return Err("model weights must be finite".to_string());
        }

        Ok(())
    }

    /// Standardized estimate from the raw lag values (oldest first) and the
    /// raw regressors of the predicted row.
    fn estimate(&self, state: &FittedState, lags: &[f64], regressors: [f64; 3]) -> f64 {
        let autoregressive: f64 = self
            .ar_weights
            .iter()
            .zip(lags.iter().rev())
            .map(|(w, y)| w * state.target.transform(*y))
            .sum();

        let exogenous: f64 = self
            .regressor_weights
            .iter()
            .zip(&state.regressors)
            .zip(regressors)
            .map(|((w, scaler), x)| w * scaler.transform(x))
            .sum();

        self.bias + autoregressive + exogenous
    }

    fn fit_state(reference: &[Observation], targets: &[f64]) -> Result<FittedState, DomainError> {
        let target = StandardScaler::fit(targets)?;

        let regressors = (0..3)
            .map(|j| {
                let column: Vec<f64> = reference.iter().map(|row| row.regressors()[j]).collect();
                StandardScaler::fit(&column)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FittedState { target, regressors })
    }
}

impl ForecastModel for LaggedRegressionModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn regressors(&self) -> &[String] {
        &self.regressors
    }

    fn is_ready(&self) -> bool {
        self.fitted.is_some()
    }

    fn bring_to_ready_state(
        &mut self,
        reference: &[Observation],
        config: &WarmFitConfig,
    ) -> Result<(), DomainError> {
        if config.epochs == 0 {
            return Err(DomainError::warm_fit("epochs must be at least 1"));
        }

        if !config.learning_rate.is_finite() || config.learning_rate <= 0.0 {
            return Err(DomainError::warm_fit(format!(
                "invalid learning rate {}",
                config.learning_rate
            )));
        }

        if reference.len() <= self.n_lags {
            return Err(DomainError::warm_fit(format!(
                "need more than {} reference rows, found {}",
                self.n_lags,
                reference.len()
            )));
        }

        let targets: Vec<f64> = reference.iter().filter_map(|row| row.target).collect();

        if targets.len() != reference.len() {
            return Err(DomainError::warm_fit("every reference row must carry a target"));
        }

        let state = Self::fit_state(reference, &targets)?;
        let samples = (reference.len() - self.n_lags) as f64;

        for epoch in 0..config.epochs {
            let mut residual_sum = 0.0;
            let mut squared_sum = 0.0;

            for t in self.n_lags..reference.len() {
                let actual = state.target.transform(targets[t]);
                let estimate =
                    self.estimate(&state, &targets[t - self.n_lags..t], reference[t].regressors());
                let residual = actual - estimate;

                residual_sum += residual;
                squared_sum += residual * residual;
            }

            let loss = squared_sum / samples;

            if !loss.is_finite() {
                return Err(DomainError::warm_fit(format!(
                    "loss is not finite at epoch {}",
                    epoch
                )));
            }

            // Gradient step on the intercept only; learned weights stay fixed.
            self.bias += 2.0 * config.learning_rate * residual_sum / samples;

            debug!(model = %self.name, epoch, loss, bias = self.bias, "Warm-fit epoch");
        }

        self.fitted = Some(state);
        Ok(())
    }

    fn predict(&self, window: &ContextWindow) -> Result<f64, DomainError> {
        let state = self.fitted.as_ref().ok_or_else(|| {
            DomainError::internal(format!("model '{}' has not been warm-fitted", self.name))
        })?;

        if !window.schema().matches(&self.regressors) {
            return Err(DomainError::internal(format!(
                "context window columns {:?} do not match model regressors {:?}",
                window.schema().regressor_names(),
                self.regressors
            )));
        }

        let history = window.history();

        if history.len() < self.n_lags {
            return Err(DomainError::insufficient_history(self.n_lags, history.len()));
        }

        let lags: Vec<f64> = history[history.len() - self.n_lags..]
            .iter()
            .filter_map(|row| row.target)
            .collect();

        let standardized = self.estimate(state, &lags, window.future().regressors());

        Ok(state.target.inverse_transform(standardized))
    }
}

/// Reads [`LaggedRegressionModel`] artifacts from JSON files
#[derive(Debug, Clone, Default)]
pub struct JsonModelStore;

impl JsonModelStore {
    pub fn new() -> Self {
        Self
    }
}

impl ModelStore for JsonModelStore {
    fn load(&self, path: &Path) -> Result<Box<dyn ForecastModel>, DomainError> {
        let shown = path.display().to_string();

        let contents = std::fs::read_to_string(path)
            .map_err(|e| DomainError::model_load(&shown, format!("cannot read: {}", e)))?;

        let model: LaggedRegressionModel = serde_json::from_str(&contents)
            .map_err(|e| DomainError::model_load(&shown, format!("cannot deserialize: {}", e)))?;

        model
            .validate()
            .map_err(|message| DomainError::model_load(&shown, message))?;

        info!(
            path = %shown,
            model = %model.name,
            n_lags = model.n_lags,
            "Loaded model artifact"
        );

        Ok(Box::new(model))
    }
}
