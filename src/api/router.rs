use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use super::forecast;
use super::health;
use super::middleware::{logging_middleware, metrics_middleware};
use super::state::AppState;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .route("/realtime", get(forecast::realtime))
        .route("/realtime/{city}", get(forecast::realtime_city))
        .route("/predict", post(forecast::predict))
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Full router plus the Prometheus endpoint when metrics are enabled
pub fn create_router_with_metrics(state: AppState, metrics: Option<PrometheusMetrics>) -> Router {
    let router = create_router_with_state(state);

    match metrics {
        Some(m) => router.merge(create_metrics_router(m)),
        None => router,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use chrono::NaiveDate;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::api::state::{MockPredictionServiceTrait, MockRealtimeServiceTrait};
    use crate::domain::{normalize_full, DomainError, PredictionResult, RegressorSet, WeatherPayload};
    use crate::infrastructure::services::CityRealtime;

    fn app(prediction: MockPredictionServiceTrait, realtime: MockRealtimeServiceTrait) -> Router {
        create_router_with_state(AppState::new(Arc::new(prediction), Arc::new(realtime)))
    }

    fn predict_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };

        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(
            app(MockPredictionServiceTrait::new(), MockRealtimeServiceTrait::new()),
            Request::builder().uri("/health").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_ready_when_model_warms() {
        let mut prediction = MockPredictionServiceTrait::new();
        prediction.expect_ensure_ready().times(1).returning(|| Ok(()));

        let (status, body) = send(
            app(prediction, MockRealtimeServiceTrait::new()),
            Request::builder().uri("/ready").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["checks"][0]["name"], "forecast_model");
    }

    #[tokio::test]
    async fn test_not_ready_when_warm_fit_fails() {
        let mut prediction = MockPredictionServiceTrait::new();
        prediction
            .expect_ensure_ready()
            .returning(|| Err(DomainError::warm_fit("loss is not finite at epoch 0")));

        let (status, body) = send(
            app(prediction, MockRealtimeServiceTrait::new()),
            Request::builder().uri("/ready").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "unhealthy");
        assert!(body["checks"][0]["message"]
            .as_str()
            .unwrap()
            .contains("loss is not finite"));
    }

    #[tokio::test]
    async fn test_predict() {
        let mut prediction = MockPredictionServiceTrait::new();
        prediction
            .expect_predict()
            .withf(|request| request.city == "Montreal" && request.temp_c == Some(10.0))
            .times(1)
            .returning(|request| {
                Ok(PredictionResult {
                    city: request.city,
                    timestamp: NaiveDate::from_ymd_opt(2005, 3, 18)
                        .unwrap()
                        .and_hms_opt(0, 0, 0)
                        .unwrap(),
                    value: 2.4,
                    inputs: RegressorSet::new(10.0, 55.0, None),
                })
            });

        let (status, body) = send(
            app(prediction, MockRealtimeServiceTrait::new()),
            predict_request(r#"{"city": "Montreal", "temp_c": 10.0, "rh": 55.0}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "city": "Montreal",
                "ds": "2005-03-18 00:00:00",
                "yhat1": 2.4,
                "inputs": {"T": 10.0, "RH": 55.0, "NO2(GT)": null}
            })
        );
    }

    #[tokio::test]
    async fn test_predict_error_mapping() {
        let cases = [
            (DomainError::unknown_city("Paris"), StatusCode::BAD_REQUEST),
            (DomainError::missing_field("current.humidity"), StatusCode::BAD_REQUEST),
            (DomainError::provider("weatherapi", "timeout"), StatusCode::SERVICE_UNAVAILABLE),
            (DomainError::insufficient_history(48, 12), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            let mut prediction = MockPredictionServiceTrait::new();
            let returned = err.clone();
            prediction
                .expect_predict()
                .returning(move |_| Err(returned.clone()));

            let (status, body) = send(
                app(prediction, MockRealtimeServiceTrait::new()),
                predict_request(r#"{"city": "Paris"}"#),
            )
            .await;

            assert_eq!(status, expected, "{err}");
            assert_eq!(body["error"]["message"], err.to_string());
        }
    }

    #[tokio::test]
    async fn test_predict_rejects_malformed_body() {
        let mut prediction = MockPredictionServiceTrait::new();
        prediction.expect_predict().times(0);

        let (status, body) = send(
            app(prediction, MockRealtimeServiceTrait::new()),
            predict_request(r#"{"temp_c": "warm"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "invalid_request_error");
    }

    #[tokio::test]
    async fn test_realtime_lists_every_city() {
        let mut realtime = MockRealtimeServiceTrait::new();
        realtime.expect_realtime().times(1).returning(|| {
            vec![
                CityRealtime::Unavailable {
                    city: "Montreal".to_string(),
                    error: "Provider error: weatherapi - HTTP 500".to_string(),
                },
                CityRealtime::Unavailable {
                    city: "Trois-Rivieres".to_string(),
                    error: "Provider error: weatherapi - HTTP 500".to_string(),
                },
            ]
        });

        let (status, body) = send(
            app(MockPredictionServiceTrait::new(), realtime),
            Request::builder().uri("/realtime").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cities"].as_array().unwrap().len(), 2);
        assert_eq!(body["cities"][1]["city"], "Trois-Rivieres");
    }

    #[tokio::test]
    async fn test_realtime_single_city() {
        let mut realtime = MockRealtimeServiceTrait::new();
        realtime
            .expect_realtime_for()
            .withf(|city| city == "montreal")
            .times(1)
            .returning(|_| Ok(normalize_full(&WeatherPayload::default(), "Montreal")));

        let (status, body) = send(
            app(MockPredictionServiceTrait::new(), realtime),
            Request::builder()
                .uri("/realtime/montreal")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["city"], "Montreal");
        assert_eq!(body["source"], "WeatherAPI");
    }

    #[tokio::test]
    async fn test_realtime_unknown_city() {
        let mut realtime = MockRealtimeServiceTrait::new();
        realtime
            .expect_realtime_for()
            .returning(|city| Err(DomainError::unknown_city(city)));

        let (status, body) = send(
            app(MockPredictionServiceTrait::new(), realtime),
            Request::builder()
                .uri("/realtime/Paris")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "invalid_request_error");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, _) = send(
            app(MockPredictionServiceTrait::new(), MockRealtimeServiceTrait::new()),
            Request::builder().uri("/v1/models").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
