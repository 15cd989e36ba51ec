//! WeatherAPI `current.json` payload
//!
//! Every field is optional: absence and JSON `null` both deserialize to
//! `None`, and downstream code decides which fields are mandatory.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherPayload {
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub current: Option<CurrentConditions>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub localtime: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub last_updated: Option<String>,
    pub temp_c: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_kph: Option<f64>,
    pub wind_dir: Option<String>,
    pub pressure_mb: Option<f64>,
    pub precip_mm: Option<f64>,
    pub cloud: Option<f64>,
    pub feelslike_c: Option<f64>,
    pub vis_km: Option<f64>,
    pub air_quality: Option<AirQuality>,
}

/// Pollutant concentrations (µg/m³) and air quality indices
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirQuality {
    pub co: Option<f64>,
    pub no2: Option<f64>,
    pub o3: Option<f64>,
    pub so2: Option<f64>,
    pub pm2_5: Option<f64>,
    pub pm10: Option<f64>,
    #[serde(rename = "us-epa-index")]
    pub us_epa_index: Option<f64>,
    #[serde(rename = "gb-defra-index")]
    pub gb_defra_index: Option<f64>,
}
