//! Request/response logging middleware

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::info;

/// Log every request and its completion.
///
/// `TraceLayer` owns the request span; this middleware only emits events.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = extract_path(&request);
    let request_id = extract_request_id(&request);

    info!(
        method = %method,
        path = %path,
        request_id = %request_id,
        headers = %redact_headers(&request),
        "Incoming request"
    );

    let response = next.run(request).await;

    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        request_id = %request_id,
        "Request completed"
    );

    response
}

fn extract_path(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

fn extract_request_id(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

/// Headers worth logging; credential-bearing ones are redacted
const LOGGED_HEADERS: [(&str, bool); 7] = [
    ("content-type", false),
    ("content-length", false),
    ("accept", false),
    ("user-agent", false),
    ("x-forwarded-for", false),
    ("authorization", true),
    ("x-api-key", true),
];

fn redact_headers(request: &Request<Body>) -> String {
    request
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            let (_, redacted) = LOGGED_HEADERS
                .iter()
                .find(|(logged, _)| *logged == name.as_str())?;

            let value = if *redacted {
                "[REDACTED]"
            } else {
                value.to_str().unwrap_or("[invalid]")
            };

            Some(format!("{}={}", name.as_str(), value))
        })
        .collect::<Vec<_>>()
        .join(", ")
}
