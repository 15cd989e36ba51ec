//! Prometheus metrics

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use super::config::MetricsConfig;

/// Path label used when the request did not match any route
pub const UNMATCHED_PATH: &str = "unmatched";

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
    path: String,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Install the global Prometheus recorder
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("aq_co_predictor_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
                path: config.path.clone(),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics) -> Router {
    let path = metrics.path().to_string();

    Router::new()
        .route(&path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

fn outcome_label(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "error"
    }
}

/// Record an HTTP request metric. `path` should be the matched route.
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// Record a completed or failed prediction
pub fn record_prediction(city: &str, source: &str, duration: Duration, success: bool) {
    let labels = [
        ("city", city.to_string()),
        ("source", source.to_string()),
        ("status", outcome_label(success).to_string()),
    ];

    counter!("predictions_total", &labels).increment(1);
    histogram!("prediction_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Record one load-and-warm-fit of a model artifact
pub fn record_model_warmup(model: &str, duration: Duration, success: bool) {
    let labels = [
        ("model", model.to_string()),
        ("status", outcome_label(success).to_string()),
    ];

    counter!("model_warmups_total", &labels).increment(1);
    histogram!("model_warmup_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Record a weather provider call
pub fn record_provider_request(provider: &str, duration: Duration, success: bool) {
    let labels = [
        ("provider", provider.to_string()),
        ("status", outcome_label(success).to_string()),
    ];

    counter!("provider_requests_total", &labels).increment(1);
    histogram!("provider_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if !success {
        counter!("provider_errors_total", &labels).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_label() {
        assert_eq!(outcome_label(true), "success");
        assert_eq!(outcome_label(false), "error");
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_prediction("Montreal", "request", Duration::from_millis(5), true);
        record_model_warmup("models/co.json", Duration::from_millis(5), false);
        record_provider_request("weatherapi", Duration::from_millis(5), true);
        record_http_request("GET", "/health", 200, Duration::from_millis(1));
    }

    #[test]
    fn test_disabled_metrics() {
        let config = MetricsConfig {
            enabled: false,
            ..MetricsConfig::default()
        };

        assert!(init_metrics(&config).is_none());
    }
}
