//! CSV reference dataset loading

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::domain::{DomainError, Observation, RegressorSchema};

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Load the reference series from a CSV file.
///
/// Rows missing the timestamp, the target or any regressor are dropped.
/// The result is sorted by timestamp and never empty.
pub fn load_reference_rows(
    path: &Path,
    schema: &RegressorSchema,
) -> Result<Vec<Observation>, DomainError> {
    let shown = path.display().to_string();

    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| DomainError::reference_data(&shown, format!("cannot open: {}", e)))?;

    let headers = reader
        .headers()
        .map_err(|e| DomainError::reference_data(&shown, format!("cannot read header: {}", e)))?
        .clone();

    let mut indices = [0usize; 5];
    let mut missing = Vec::new();

    for (slot, column) in indices.iter_mut().zip(schema.columns()) {
        match headers.iter().position(|h| h.trim() == column) {
            Some(index) => *slot = index,
            None => missing.push(column),
        }
    }

    if !missing.is_empty() {
        return Err(DomainError::reference_data(
            &shown,
            format!("missing required column(s): {}", missing.join(", ")),
        ));
    }

    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for record in reader.records() {
        let record = record
            .map_err(|e| DomainError::reference_data(&shown, format!("malformed row: {}", e)))?;

        match parse_row(&record, &indices) {
            Some(row) => rows.push(row),
            None => dropped += 1,
        }
    }

    if rows.is_empty() {
        return Err(DomainError::reference_data(
            &shown,
            "no usable rows after dropping incomplete ones",
        ));
    }

    rows.sort_by_key(|row| row.timestamp);

    debug!(
        path = %shown,
        rows = rows.len(),
        dropped = dropped,
        "Loaded reference dataset"
    );

    Ok(rows)
}

/// `indices` holds the positions of the schema columns, in schema order
fn parse_row(record: &csv::StringRecord, indices: &[usize; 5]) -> Option<Observation> {
    let [ts, y, t, rh, g] = *indices;

    Some(Observation {
        timestamp: parse_timestamp(record.get(ts)?)?,
        target: Some(parse_number(record.get(y)?)?),
        temperature: parse_number(record.get(t)?)?,
        humidity: parse_number(record.get(rh)?)?,
        trace_gas: parse_number(record.get(g)?)?,
    })
}

/// Parse a timestamp cell; date-only values map to midnight
pub fn parse_timestamp(cell: &str) -> Option<NaiveDateTime> {
    let cell = cell.trim();

    if cell.is_empty() {
        return None;
    }

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(cell, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(cell, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Parse a numeric cell; empty, unparsable and non-finite values are missing
fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
