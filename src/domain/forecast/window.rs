//! Timestamped observations and the context window handed to the model

use chrono::{Duration, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use super::RegressorSchema;
use crate::domain::DomainError;

/// How the trailing history is placed on the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorStrategy {
    /// Keep the reference timestamps; the forecast is for the hour after
    /// the last reference row.
    #[default]
    Data,
    /// Shift the history so it ends at the current hour; the forecast is
    /// for the next wall-clock hour.
    Clock,
}

/// One row of the model input table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub timestamp: NaiveDateTime,
    /// `None` only for the future row
    pub target: Option<f64>,
    pub temperature: f64,
    pub humidity: f64,
    pub trace_gas: f64,
}

impl Observation {
    /// Regressor values in schema order
    pub fn regressors(&self) -> [f64; 3] {
        [self.temperature, self.humidity, self.trace_gas]
    }
}

/// Returns true when the timestamp sits exactly on an hour boundary
pub fn is_hour_aligned(timestamp: &NaiveDateTime) -> bool {
    timestamp.minute() == 0 && timestamp.second() == 0 && timestamp.nanosecond() == 0
}

/// `N` hourly history rows followed by exactly one future row.
///
/// Invariants, checked on construction:
/// - history is non-empty, every history target is known and finite
/// - timestamps are hour-aligned and step by exactly one hour
/// - the future row has an unknown target and sits one hour after the history
/// - every regressor value is finite
#[derive(Debug, Clone, PartialEq)]
pub struct ContextWindow {
    schema: RegressorSchema,
    rows: Vec<Observation>,
}

impl ContextWindow {
    pub fn new(
        schema: RegressorSchema,
        history: Vec<Observation>,
        future: Observation,
    ) -> Result<Self, DomainError> {
        if history.is_empty() {
            return Err(DomainError::internal("context window has no history rows"));
        }

        if future.target.is_some() {
            return Err(DomainError::internal("future row must have an unknown target"));
        }

        let mut rows = history;
        rows.push(future);

        for (index, row) in rows.iter().enumerate() {
            if !is_hour_aligned(&row.timestamp) {
                return Err(DomainError::internal(format!(
                    "row {} timestamp {} is not hour-aligned",
                    index, row.timestamp
                )));
            }

            if row.regressors().iter().any(|v| !v.is_finite()) {
                return Err(DomainError::internal(format!(
                    "row {} has a non-finite regressor",
                    index
                )));
            }

            let is_future = index == rows.len() - 1;
            let target_known = row.target.is_some_and(f64::is_finite);

            if !is_future && !target_known {
                return Err(DomainError::internal(format!(
                    "history row {} has no target",
                    index
                )));
            }
        }

        for pair in rows.windows(2) {
            if pair[1].timestamp - pair[0].timestamp != Duration::hours(1) {
                return Err(DomainError::internal(format!(
                    "context window is not hourly between {} and {}",
                    pair[0].timestamp, pair[1].timestamp
                )));
            }
        }

        Ok(Self { schema, rows })
    }

    pub fn schema(&self) -> &RegressorSchema {
        &self.schema
    }

    /// All rows, future row last
    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    pub fn history(&self) -> &[Observation] {
        &self.rows[..self.rows.len() - 1]
    }

    pub fn future(&self) -> &Observation {
        &self.rows[self.rows.len() - 1]
    }

    /// Number of rows including the future row
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn hour(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn observed(h: u32, y: f64) -> Observation {
        Observation {
            timestamp: hour(h),
            target: Some(y),
            temperature: 5.0,
            humidity: 60.0,
            trace_gas: 12.0,
        }
    }

    fn future(h: u32) -> Observation {
        Observation {
            target: None,
            ..observed(h, 0.0)
        }
    }

    #[test]
    fn test_valid_window() {
        let window = ContextWindow::new(
            RegressorSchema::default(),
            vec![observed(0, 1.0), observed(1, 1.5), observed(2, 2.0)],
            future(3),
        )
        .unwrap();

        assert_eq!(window.len(), 4);
        assert_eq!(window.history().len(), 3);
        assert_eq!(window.future().timestamp, hour(3));
        assert!(window.future().target.is_none());
    }

    #[test]
    fn test_gap_is_rejected() {
        let result = ContextWindow::new(
            RegressorSchema::default(),
            vec![observed(0, 1.0), observed(2, 1.5)],
            future(3),
        );
        assert!(matches!(result, Err(DomainError::Internal { .. })));
    }

    #[test]
    fn test_future_row_must_follow_history() {
        let result = ContextWindow::new(
            RegressorSchema::default(),
            vec![observed(0, 1.0), observed(1, 1.5)],
            future(4),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_future_row_with_target_is_rejected() {
        let result = ContextWindow::new(
            RegressorSchema::default(),
            vec![observed(0, 1.0)],
            observed(1, 2.0),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_history_target_is_rejected() {
        let mut row = observed(0, 1.0);
        row.target = None;

        let result = ContextWindow::new(RegressorSchema::default(), vec![row], future(1));
        assert!(result.is_err());
    }

    #[test]
    fn test_unaligned_timestamp_is_rejected() {
        let mut row = observed(0, 1.0);
        row.timestamp = row.timestamp + Duration::minutes(30);

        let result = ContextWindow::new(RegressorSchema::default(), vec![row], future(1));
        assert!(result.is_err());
    }

    #[test]
    fn test_anchor_strategy_deserialization() {
        let anchor: AnchorStrategy = serde_json::from_str("\"clock\"").unwrap();
        assert_eq!(anchor, AnchorStrategy::Clock);
        assert_eq!(AnchorStrategy::default(), AnchorStrategy::Data);
    }
}
