//! Z-score scaling of a single column

use crate::domain::DomainError;

/// Standard scaler: `(x - mean) / std`.
///
/// A constant column (std ≈ 0) transforms to zero and inverse transforms
/// to its mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardScaler {
    mean: f64,
    std: f64,
}

impl StandardScaler {
    const EPSILON: f64 = 1e-10;

    pub fn fit(values: &[f64]) -> Result<Self, DomainError> {
        if values.is_empty() {
            return Err(DomainError::warm_fit("cannot fit scaler on empty values"));
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        if !mean.is_finite() || !variance.is_finite() {
            return Err(DomainError::warm_fit("scaler statistics are not finite"));
        }

        Ok(Self {
            mean,
            std: variance.sqrt(),
        })
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std(&self) -> f64 {
        self.std
    }

    pub fn is_constant(&self) -> bool {
        self.std < Self::EPSILON
    }

    pub fn transform(&self, value: f64) -> f64 {
        if self.is_constant() {
            return 0.0;
        }

        (value - self.mean) / self.std
    }

    pub fn inverse_transform(&self, value: f64) -> f64 {
        if self.is_constant() {
            return self.mean;
        }

        value * self.std + self.mean
    }
}
