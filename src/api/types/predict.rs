//! Request and response bodies of the forecasting endpoints

use serde::{Deserialize, Serialize};

use crate::domain::{PredictionRequest, PredictionResult, RegressorSet};
use crate::infrastructure::services::CityRealtime;

/// `ds` rendering of the forecast hour
pub const DS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `POST /predict` body. Readings are optional; the provider fills in
/// when temperature or humidity is missing.
pub type PredictBody = PredictionRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub city: String,
    /// Forecast hour
    pub ds: String,
    /// Forecast CO concentration
    pub yhat1: f64,
    /// Regressors the forecast was computed from, after clamping
    pub inputs: RegressorSet,
}

impl From<PredictionResult> for PredictResponse {
    fn from(result: PredictionResult) -> Self {
        Self {
            city: result.city,
            ds: result.timestamp.format(DS_FORMAT).to_string(),
            yhat1: result.value,
            inputs: result.inputs,
        }
    }
}

/// `GET /realtime` body
#[derive(Debug, Clone, Serialize)]
pub struct RealtimeResponse {
    pub cities: Vec<CityRealtime>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_predict_body_readings_are_optional() {
        let body: PredictBody = serde_json::from_value(json!({"city": "Montreal"})).unwrap();

        assert_eq!(body.city, "Montreal");
        assert!(body.supplied_regressors().is_none());
    }

    #[test]
    fn test_predict_response_shape() {
        let result = PredictionResult {
            city: "Montreal".to_string(),
            timestamp: NaiveDate::from_ymd_opt(2005, 3, 18)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            value: 2.4,
            inputs: RegressorSet::new(10.0, 55.0, None),
        };

        let json = serde_json::to_value(PredictResponse::from(result)).unwrap();

        assert_eq!(
            json,
            json!({
                "city": "Montreal",
                "ds": "2005-03-18 00:00:00",
                "yhat1": 2.4,
                "inputs": {"T": 10.0, "RH": 55.0, "NO2(GT)": null}
            })
        );
    }
}
