//! Fixtures shared by the forecast tests

use std::path::PathBuf;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use tempfile::TempDir;

/// `offset` hours after 2024-01-01 00:00
pub fn hour(offset: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + Duration::hours(offset)
}

pub fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Hourly reference CSV with a daily CO cycle and a constant NO2 column
pub fn write_reference_csv(
    dir: &TempDir,
    name: &str,
    start: NaiveDateTime,
    rows: usize,
    trace_gas: f64,
) -> PathBuf {
    let mut contents = String::from("ds,y,T,RH,NO2(GT)\n");

    for i in 0..rows {
        let phase = (i % 24) as f64;
        let timestamp = start + Duration::hours(i as i64);

        contents.push_str(&format!(
            "{},{:.3},{:.2},{:.1},{:.1}\n",
            timestamp.format("%Y-%m-%d %H:%M:%S"),
            1.5 + phase / 24.0,
            5.0 + phase / 4.0,
            60.0 - (i % 12) as f64,
            trace_gas,
        ));
    }

    write_file(dir, name, &contents)
}

pub const MODEL_JSON: &str = r#"{
    "name": "co-lagged-regression",
    "frequency": "h",
    "n_lags": 3,
    "regressors": ["T", "RH", "NO2(GT)"],
    "ar_weights": [0.6, 0.2, 0.1],
    "regressor_weights": [0.05, -0.03, 0.2],
    "bias": 0.0
}"#;

pub fn write_model_json(dir: &TempDir, name: &str) -> PathBuf {
    write_file(dir, name, MODEL_JSON)
}
