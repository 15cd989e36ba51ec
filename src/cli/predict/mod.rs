//! Predict command - one forecast printed to stdout as JSON

use std::sync::Arc;

use clap::Args;

use crate::api::types::PredictResponse;
use crate::domain::{CityRegistry, PredictionRequest};

#[derive(Args, Clone, Debug)]
pub struct PredictArgs {
    /// City from the configured allow-list
    #[arg(long)]
    pub city: String,

    /// Temperature in °C; with --rh, skips the weather provider
    #[arg(long, allow_negative_numbers = true)]
    pub temp_c: Option<f64>,

    /// Relative humidity in %
    #[arg(long, allow_negative_numbers = true)]
    pub rh: Option<f64>,

    /// NO2 in µg/m³; carried forward from the reference data when absent
    #[arg(long, allow_negative_numbers = true)]
    pub no2: Option<f64>,
}

impl From<PredictArgs> for PredictionRequest {
    fn from(args: PredictArgs) -> Self {
        Self {
            city: args.city,
            no2_ugm3: args.no2,
            temp_c: args.temp_c,
            rh: args.rh,
        }
    }
}

pub async fn run(args: PredictArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let provider = crate::create_weather_provider(&config)?;
    let cities = Arc::new(CityRegistry::new(config.cities.clone()));
    let service = crate::create_prediction_service(&config, cities, provider)?;

    let result = service.predict(args.into()).await?;

    println!(
        "{}",
        serde_json::to_string_pretty(&PredictResponse::from(result))?
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_into_request() {
        let request = PredictionRequest::from(PredictArgs {
            city: "Montreal".to_string(),
            temp_c: Some(4.0),
            rh: Some(70.0),
            no2: None,
        });

        assert_eq!(request.city, "Montreal");
        assert!(request.supplied_regressors().is_some());
        assert_eq!(request.no2_ugm3, None);
    }
}
