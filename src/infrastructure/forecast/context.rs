//! Builds the model input window from the reference dataset and fresh readings

use std::path::Path;

use chrono::{DateTime, Duration, NaiveDateTime, Timelike, Utc};
use chrono_tz::Tz;
use tracing::debug;

use super::reference::load_reference_rows;
use crate::domain::forecast::is_hour_aligned;
use crate::domain::{
    AnchorStrategy, ContextWindow, DomainError, Observation, RegressorSchema, RegressorSet,
};

/// Default trailing history length
pub const DEFAULT_CONTEXT_LENGTH: usize = 48;

/// Wall clock the reference dataset was recorded in
pub const DEFAULT_REFERENCE_TIMEZONE: &str = "America/Toronto";

/// Assembles [`ContextWindow`]s for one schema and anchoring strategy
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    schema: RegressorSchema,
    anchor: AnchorStrategy,
    reference_timezone: Tz,
}

impl ContextAssembler {
    pub fn new(schema: RegressorSchema, anchor: AnchorStrategy, reference_timezone: Tz) -> Self {
        Self {
            schema,
            anchor,
            reference_timezone,
        }
    }

    /// Build an assembler whose clock anchoring uses an IANA time zone name
    pub fn with_timezone_name(
        schema: RegressorSchema,
        anchor: AnchorStrategy,
        timezone: &str,
    ) -> Result<Self, DomainError> {
        let reference_timezone = timezone.parse::<Tz>().map_err(|e| {
            DomainError::configuration(format!("invalid time zone '{}': {}", timezone, e))
        })?;

        Ok(Self::new(schema, anchor, reference_timezone))
    }

    pub fn build_context(
        &self,
        reference_path: &Path,
        regressors: &RegressorSet,
        context_length: usize,
    ) -> Result<ContextWindow, DomainError> {
        self.build_context_at(reference_path, regressors, context_length, Utc::now())
    }

    /// Same as [`Self::build_context`] with an explicit wall clock
    pub fn build_context_at(
        &self,
        reference_path: &Path,
        regressors: &RegressorSet,
        context_length: usize,
        now: DateTime<Utc>,
    ) -> Result<ContextWindow, DomainError> {
        if !regressors.temperature.is_finite() {
            return Err(DomainError::invalid_regressor(format!(
                "{} must be a finite number",
                self.schema.temperature
            )));
        }

        if !regressors.humidity.is_finite() {
            return Err(DomainError::invalid_regressor(format!(
                "{} must be a finite number",
                self.schema.humidity
            )));
        }

        if context_length == 0 {
            return Err(DomainError::configuration(
                "context length must be at least 1",
            ));
        }

        let rows = load_reference_rows(reference_path, &self.schema)?;

        if rows.len() < context_length {
            return Err(DomainError::insufficient_history(context_length, rows.len()));
        }

        let mut history = rows[rows.len() - context_length..].to_vec();

        let future_timestamp = match self.anchor {
            AnchorStrategy::Data => {
                ensure_contiguous(reference_path, &history)?;
                history[history.len() - 1].timestamp + Duration::hours(1)
            }
            AnchorStrategy::Clock => {
                let current_hour = self.current_hour(now)?;
                let last = history.len() - 1;

                for (index, row) in history.iter_mut().enumerate() {
                    row.timestamp = current_hour - Duration::hours((last - index) as i64);
                }

                current_hour + Duration::hours(1)
            }
        };

        let last = history[history.len() - 1];
        let trace_gas = regressors
            .trace_gas
            .filter(|g| g.is_finite())
            .unwrap_or(last.trace_gas);

        let future = Observation {
            timestamp: future_timestamp,
            target: None,
            temperature: regressors.temperature,
            humidity: regressors.humidity,
            trace_gas,
        };

        debug!(
            anchor = ?self.anchor,
            rows = history.len(),
            future = %future_timestamp,
            trace_gas_carried = regressors.trace_gas.is_none(),
            "Assembled context window"
        );

        ContextWindow::new(self.schema.clone(), history, future)
    }

    /// `now` in the reference time zone, floored to the hour
    fn current_hour(&self, now: DateTime<Utc>) -> Result<NaiveDateTime, DomainError> {
        now.with_timezone(&self.reference_timezone)
            .naive_local()
            .with_nanosecond(0)
            .and_then(|t| t.with_second(0))
            .and_then(|t| t.with_minute(0))
            .ok_or_else(|| DomainError::internal("cannot floor current time to the hour"))
    }
}

fn ensure_contiguous(reference_path: &Path, history: &[Observation]) -> Result<(), DomainError> {
    let shown = reference_path.display().to_string();

    if let Some(row) = history.iter().find(|row| !is_hour_aligned(&row.timestamp)) {
        return Err(DomainError::reference_data(
            &shown,
            format!("timestamp {} is not hour-aligned", row.timestamp),
        ));
    }

    if let Some(pair) = history
        .windows(2)
        .find(|pair| pair[1].timestamp - pair[0].timestamp != Duration::hours(1))
    {
        return Err(DomainError::reference_data(
            &shown,
            format!(
                "trailing window is not hourly between {} and {}",
                pair[0].timestamp, pair[1].timestamp
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::forecast::test_support::{hour, write_file, write_reference_csv};
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn assembler(anchor: AnchorStrategy) -> ContextAssembler {
        ContextAssembler::with_timezone_name(
            RegressorSchema::default(),
            anchor,
            DEFAULT_REFERENCE_TIMEZONE,
        )
        .unwrap()
    }

    #[test]
    fn test_trace_gas_is_carried_forward() {
        let dir = TempDir::new().unwrap();
        let path = write_reference_csv(&dir, "ref.csv", hour(0), 60, 12.0);
        let last = hour(59);

        let window = assembler(AnchorStrategy::Data)
            .build_context(&path, &RegressorSet::new(10.0, 55.0, None), 48)
            .unwrap();

        assert_eq!(window.len(), 49);
        assert_eq!(window.history()[47].timestamp, last);

        let future = window.future();
        assert_eq!(future.timestamp, last + Duration::hours(1));
        assert_eq!(future.target, None);
        assert_eq!(future.temperature, 10.0);
        assert_eq!(future.humidity, 55.0);
        assert_eq!(future.trace_gas, 12.0);
    }

    #[test]
    fn test_supplied_trace_gas_is_used() {
        let dir = TempDir::new().unwrap();
        let path = write_reference_csv(&dir, "ref.csv", hour(0), 48, 12.0);

        let window = assembler(AnchorStrategy::Data)
            .build_context(&path, &RegressorSet::new(10.0, 55.0, Some(30.0)), 48)
            .unwrap();

        assert_eq!(window.future().trace_gas, 30.0);
    }

    #[test]
    fn test_window_is_hourly_with_known_history() {
        let dir = TempDir::new().unwrap();
        let path = write_reference_csv(&dir, "ref.csv", hour(0), 100, 12.0);

        let window = assembler(AnchorStrategy::Data)
            .build_context(&path, &RegressorSet::new(1.0, 40.0, None), 24)
            .unwrap();

        assert_eq!(window.len(), 25);
        assert!(window.history().iter().all(|r| r.target.is_some()));
        assert!(window
            .rows()
            .windows(2)
            .all(|p| p[1].timestamp - p[0].timestamp == Duration::hours(1)));
    }

    #[test]
    fn test_insufficient_history() {
        let dir = TempDir::new().unwrap();
        let path = write_reference_csv(&dir, "ref.csv", hour(0), 10, 12.0);

        let err = assembler(AnchorStrategy::Data)
            .build_context(&path, &RegressorSet::new(10.0, 55.0, None), 48)
            .unwrap_err();

        assert_eq!(err, DomainError::insufficient_history(48, 10));
    }

    #[test]
    fn test_missing_temperature_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_reference_csv(&dir, "ref.csv", hour(0), 48, 12.0);

        let err = assembler(AnchorStrategy::Data)
            .build_context(&path, &RegressorSet::new(f64::NAN, 55.0, None), 48)
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidRegressor { .. }));
    }

    #[test]
    fn test_missing_humidity_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_reference_csv(&dir, "ref.csv", hour(0), 48, 12.0);

        let err = assembler(AnchorStrategy::Data)
            .build_context(&path, &RegressorSet::new(10.0, f64::NAN, None), 48)
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidRegressor { .. }));
    }

    #[test]
    fn test_gap_in_trailing_window() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "ref.csv",
            "ds,y,T,RH,NO2(GT)\n\
             2024-01-01 00:00:00,1.0,4.0,55.0,11.0\n\
             2024-01-01 01:00:00,1.1,4.0,55.0,11.0\n\
             2024-01-01 03:00:00,1.2,4.0,55.0,11.0\n",
        );

        let err = assembler(AnchorStrategy::Data)
            .build_context(&path, &RegressorSet::new(10.0, 55.0, None), 3)
            .unwrap_err();

        assert!(matches!(err, DomainError::ReferenceData { .. }));
    }

    #[test]
    fn test_clock_anchoring() {
        let dir = TempDir::new().unwrap();
        let path = write_reference_csv(&dir, "ref.csv", hour(0), 60, 12.0);
        // 17:42 UTC is 12:42 in Toronto before the DST switch
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 17, 42, 13).unwrap();
        let current_hour = chrono::NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();

        let window = assembler(AnchorStrategy::Clock)
            .build_context_at(&path, &RegressorSet::new(10.0, 55.0, None), 48, now)
            .unwrap();

        assert_eq!(window.len(), 49);
        assert_eq!(window.history()[47].timestamp, current_hour);
        assert_eq!(
            window.history()[0].timestamp,
            current_hour - Duration::hours(47)
        );
        assert_eq!(window.future().timestamp, current_hour + Duration::hours(1));
        assert_eq!(window.future().trace_gas, 12.0);
    }

    #[test]
    fn test_clock_anchoring_tolerates_gaps() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "ref.csv",
            "ds,y,T,RH,NO2(GT)\n\
             2024-01-01 00:00:00,1.0,4.0,55.0,11.0\n\
             2024-01-01 03:30:00,1.2,4.0,55.0,11.0\n",
        );
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 17, 0, 0).unwrap();

        let window = assembler(AnchorStrategy::Clock)
            .build_context_at(&path, &RegressorSet::new(10.0, 55.0, None), 2, now)
            .unwrap();

        assert_eq!(window.len(), 3);
    }

    #[test]
    fn test_clock_anchoring_follows_daylight_saving() {
        let dir = TempDir::new().unwrap();
        let path = write_reference_csv(&dir, "ref.csv", hour(0), 10, 12.0);
        // 17:42 UTC is 13:42 in Toronto during EDT
        let now = Utc.with_ymd_and_hms(2025, 7, 10, 17, 42, 13).unwrap();
        let current_hour = chrono::NaiveDate::from_ymd_opt(2025, 7, 10)
            .unwrap()
            .and_hms_opt(13, 0, 0)
            .unwrap();

        let window = assembler(AnchorStrategy::Clock)
            .build_context_at(&path, &RegressorSet::new(25.0, 60.0, None), 4, now)
            .unwrap();

        assert_eq!(window.history()[3].timestamp, current_hour);
        assert_eq!(window.future().timestamp, current_hour + Duration::hours(1));
    }

    #[test]
    fn test_unknown_timezone_is_rejected() {
        let err = ContextAssembler::with_timezone_name(
            RegressorSchema::default(),
            AnchorStrategy::Clock,
            "Mars/Olympus_Mons",
        )
        .unwrap_err();

        assert!(matches!(err, DomainError::Configuration { .. }));
    }

    #[test]
    fn test_zero_context_length() {
        let dir = TempDir::new().unwrap();
        let path = write_reference_csv(&dir, "ref.csv", hour(0), 5, 12.0);

        let err = assembler(AnchorStrategy::Data)
            .build_context(&path, &RegressorSet::new(10.0, 55.0, None), 0)
            .unwrap_err();

        assert!(matches!(err, DomainError::Configuration { .. }));
    }
}
