//! Input clamping and output repair around model inference

use super::RegressorSet;

/// Plausible air temperature range, °C
pub const TEMPERATURE_RANGE: (f64, f64) = (-50.0, 50.0);

/// Relative humidity range, %
pub const HUMIDITY_RANGE: (f64, f64) = (0.0, 100.0);

/// Plausible NO2 range, µg/m³
pub const TRACE_GAS_RANGE: (f64, f64) = (0.0, 500.0);

/// Plausible CO range in the model's native units (mg/m³)
pub const FORECAST_RANGE: (f64, f64) = (0.0, 15.0);

/// Clamp regressors into physically plausible ranges.
///
/// Out-of-range sensor or provider noise is clamped, never rejected. An
/// unknown trace-gas value stays unknown.
pub fn sanitize_inputs(regressors: &RegressorSet) -> RegressorSet {
    RegressorSet {
        temperature: regressors
            .temperature
            .clamp(TEMPERATURE_RANGE.0, TEMPERATURE_RANGE.1),
        humidity: regressors.humidity.clamp(HUMIDITY_RANGE.0, HUMIDITY_RANGE.1),
        trace_gas: regressors
            .trace_gas
            .map(|g| g.clamp(TRACE_GAS_RANGE.0, TRACE_GAS_RANGE.1)),
    }
}

/// Repair the raw forecast: mirror negative values, then clamp.
///
/// The model occasionally emits a mirrored value near zero for this
/// target, so the sign flip must happen before clamping.
pub fn sanitize_output(raw_value: f64) -> f64 {
    let mirrored = if raw_value < 0.0 { -raw_value } else { raw_value };

    mirrored.clamp(FORECAST_RANGE.0, FORECAST_RANGE.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_output_flips_negative() {
        assert!((sanitize_output(-3.2) - 3.2).abs() < 1e-12);
    }

    #[test]
    fn test_sanitize_output_flips_then_clamps() {
        assert_eq!(sanitize_output(-20.0), 15.0);
    }

    #[test]
    fn test_sanitize_output_within_range() {
        assert_eq!(sanitize_output(7.5), 7.5);
        assert_eq!(sanitize_output(0.0), 0.0);
    }

    #[test]
    fn test_sanitize_output_clamps_high() {
        assert_eq!(sanitize_output(42.0), 15.0);
    }

    #[test]
    fn test_sanitize_inputs_clamps_every_regressor() {
        let sanitized = sanitize_inputs(&RegressorSet::new(120.0, -5.0, Some(900.0)));
        assert_eq!(sanitized, RegressorSet::new(50.0, 0.0, Some(500.0)));
    }

    #[test]
    fn test_sanitize_inputs_keeps_unknown_trace_gas() {
        let sanitized = sanitize_inputs(&RegressorSet::new(-80.0, 140.0, None));
        assert_eq!(sanitized, RegressorSet::new(-50.0, 100.0, None));
    }

    #[test]
    fn test_sanitize_inputs_leaves_valid_values() {
        let input = RegressorSet::new(21.5, 40.0, Some(18.0));
        assert_eq!(sanitize_inputs(&input), input);
    }
}
