use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::RegressorSet;

/// A request for the one-hour-ahead CO forecast of a city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub city: String,
    /// NO2 in µg/m³, when measured by the caller
    #[serde(default)]
    pub no2_ugm3: Option<f64>,
    /// Temperature in °C, when measured by the caller
    #[serde(default)]
    pub temp_c: Option<f64>,
    /// Relative humidity in %, when measured by the caller
    #[serde(default)]
    pub rh: Option<f64>,
}

impl PredictionRequest {
    pub fn for_city(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            no2_ugm3: None,
            temp_c: None,
            rh: None,
        }
    }

    pub fn with_readings(mut self, temp_c: f64, rh: f64, no2_ugm3: Option<f64>) -> Self {
        self.temp_c = Some(temp_c);
        self.rh = Some(rh);
        self.no2_ugm3 = no2_ugm3;
        self
    }

    /// Caller-supplied regressors, available only when both temperature
    /// and humidity were provided.
    pub fn supplied_regressors(&self) -> Option<RegressorSet> {
        match (self.temp_c, self.rh) {
            (Some(temperature), Some(humidity)) => {
                Some(RegressorSet::new(temperature, humidity, self.no2_ugm3))
            }
            _ => None,
        }
    }
}

/// Outcome of a successful prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub city: String,
    /// Hour the forecast applies to
    pub timestamp: NaiveDateTime,
    /// CO concentration, always within the realistic range
    pub value: f64,
    /// Regressors the forecast was computed from, after clamping
    pub inputs: RegressorSet,
}
