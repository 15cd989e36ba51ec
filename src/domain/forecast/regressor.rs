//! Regressor sets and the column schema shared by the reference data and the model

use serde::{Deserialize, Serialize};

/// The three explanatory inputs the CO model consumes.
///
/// `trace_gas` (NO2) may be unknown, which is distinct from a zero reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressorSet {
    /// Air temperature in °C
    #[serde(rename = "T")]
    pub temperature: f64,
    /// Relative humidity in %
    #[serde(rename = "RH")]
    pub humidity: f64,
    /// NO2 concentration in µg/m³
    #[serde(rename = "NO2(GT)")]
    pub trace_gas: Option<f64>,
}

impl RegressorSet {
    pub fn new(temperature: f64, humidity: f64, trace_gas: Option<f64>) -> Self {
        Self {
            temperature,
            humidity,
            trace_gas,
        }
    }
}

/// Column names of the tabular model input, in model order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RegressorSchema {
    pub timestamp: String,
    pub target: String,
    pub temperature: String,
    pub humidity: String,
    pub trace_gas: String,
}

impl Default for RegressorSchema {
    fn default() -> Self {
        Self {
            timestamp: "ds".to_string(),
            target: "y".to_string(),
            temperature: "T".to_string(),
            humidity: "RH".to_string(),
            trace_gas: "NO2(GT)".to_string(),
        }
    }
}

impl RegressorSchema {
    /// Regressor column names, in the order the model expects them
    pub fn regressor_names(&self) -> [&str; 3] {
        [&self.temperature, &self.humidity, &self.trace_gas]
    }

    /// All columns of the model input table
    pub fn columns(&self) -> [&str; 5] {
        [
            &self.timestamp,
            &self.target,
            &self.temperature,
            &self.humidity,
            &self.trace_gas,
        ]
    }

    /// Whether a model bound to `regressors` can consume this schema
    pub fn matches(&self, regressors: &[String]) -> bool {
        regressors.len() == 3
            && regressors
                .iter()
                .zip(self.regressor_names())
                .all(|(model, column)| model == column)
    }
}
