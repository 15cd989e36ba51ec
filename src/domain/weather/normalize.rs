//! Feature normalization from provider payloads

use std::collections::BTreeMap;

use super::payload::{AirQuality, WeatherPayload};
use super::realtime::{
    AqiIndices, Availability, CurrentAirQuality, CurrentWeather, FeatureSnapshot, RealtimeRecord,
};
use crate::domain::forecast::RegressorSet;
use crate::domain::DomainError;

/// Name reported as the data source of realtime records
pub const WEATHERAPI_SOURCE_NAME: &str = "WeatherAPI";

/// Extract the model regressors from a payload.
///
/// Temperature and humidity are mandatory. A missing NO2 reading stays
/// unknown here; any defaulting belongs to the context assembler.
pub fn normalize(payload: &WeatherPayload) -> Result<RegressorSet, DomainError> {
    let current = payload
        .current
        .as_ref()
        .ok_or_else(|| DomainError::missing_field("current"))?;

    let temperature = current
        .temp_c
        .ok_or_else(|| DomainError::missing_field("current.temp_c"))?;
    let humidity = current
        .humidity
        .ok_or_else(|| DomainError::missing_field("current.humidity"))?;
    let trace_gas = current.air_quality.as_ref().and_then(|aq| aq.no2);

    Ok(RegressorSet::new(temperature, humidity, trace_gas))
}

/// Build the full realtime record for a city.
///
/// Never fails: every field is nullable and flagged through [`Availability`].
pub fn normalize_full(payload: &WeatherPayload, city_hint: &str) -> RealtimeRecord {
    let location = payload.location.clone().unwrap_or_default();
    let current = payload.current.clone().unwrap_or_default();
    let air_quality = current.air_quality.clone().unwrap_or_default();

    let city = location
        .name
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(city_hint)
        .trim()
        .to_string();

    let ts = current
        .last_updated
        .clone()
        .or_else(|| location.localtime.clone())
        .unwrap_or_default();

    let current_air_quality = build_air_quality(&air_quality);

    let mut weather_availability = Availability::new();
    let current_weather = CurrentWeather {
        temp_c: weather_availability.track("temp_c", current.temp_c),
        humidity: weather_availability.track("humidity", current.humidity),
        wind_kph: weather_availability.track("wind_kph", current.wind_kph),
        wind_dir: weather_availability.track("wind_dir", current.wind_dir.clone()),
        pressure_mb: weather_availability.track("pressure_mb", current.pressure_mb),
        precip_mm: weather_availability.track("precip_mm", current.precip_mm),
        cloud: weather_availability.track("cloud", current.cloud),
        feelslike_c: weather_availability.track("feelslike_c", current.feelslike_c),
        vis_km: weather_availability.track("vis_km", current.vis_km),
        availability: weather_availability,
    };

    let features_used_for_prediction = FeatureSnapshot {
        temperature: current.temp_c,
        humidity: current.humidity,
        trace_gas: air_quality.no2,
    };

    RealtimeRecord {
        city,
        lat: location.lat,
        lon: location.lon,
        ts,
        source: WEATHERAPI_SOURCE_NAME.to_string(),
        current_air_quality,
        current_weather,
        features_used_for_prediction,
    }
}

fn build_air_quality(aq: &AirQuality) -> CurrentAirQuality {
    let mut availability = Availability::new();

    let pollutants = [
        ("CO", aq.co),
        ("NO2", aq.no2),
        ("O3", aq.o3),
        ("SO2", aq.so2),
        ("PM2.5", aq.pm2_5),
        ("PM10", aq.pm10),
    ];

    let mut pollutants_ugm3 = BTreeMap::new();
    for (label, value) in pollutants {
        pollutants_ugm3.insert(label.to_string(), availability.track(label, value));
    }

    let aqi = AqiIndices {
        us_epa_index: availability.track("us_epa_index", aq.us_epa_index),
        gb_defra_index: availability.track("gb_defra_index", aq.gb_defra_index),
    };

    CurrentAirQuality {
        pollutants_ugm3,
        aqi,
        availability,
    }
}
