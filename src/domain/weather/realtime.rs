//! Presentation record for the "current conditions" query

use std::collections::BTreeMap;

use serde::Serialize;

/// Per-field presence flags.
///
/// A field is available iff the source payload carried a non-null value
/// for it, regardless of what the value is.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Availability(BTreeMap<String, bool>);

impl Availability {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the presence of `value` under `field` and pass the value through
    pub fn track<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        self.0.insert(field.to_string(), value.is_some());
        value
    }

    pub fn get(&self, field: &str) -> Option<bool> {
        self.0.get(field).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Air quality indices
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AqiIndices {
    pub us_epa_index: Option<f64>,
    pub gb_defra_index: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CurrentAirQuality {
    /// Display name → concentration in µg/m³
    pub pollutants_ugm3: BTreeMap<String, Option<f64>>,
    pub aqi: AqiIndices,
    pub availability: Availability,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CurrentWeather {
    pub temp_c: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_kph: Option<f64>,
    pub wind_dir: Option<String>,
    pub pressure_mb: Option<f64>,
    pub precip_mm: Option<f64>,
    pub cloud: Option<f64>,
    pub feelslike_c: Option<f64>,
    pub vis_km: Option<f64>,
    pub availability: Availability,
}

/// The regressors a prediction would use, before any defaulting
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FeatureSnapshot {
    #[serde(rename = "T")]
    pub temperature: Option<f64>,
    #[serde(rename = "RH")]
    pub humidity: Option<f64>,
    #[serde(rename = "NO2(GT)")]
    pub trace_gas: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RealtimeRecord {
    pub city: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub ts: String,
    pub source: String,
    pub current_air_quality: CurrentAirQuality,
    pub current_weather: CurrentWeather,
    pub features_used_for_prediction: FeatureSnapshot,
}
