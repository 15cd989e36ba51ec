//! Forecasting endpoint handlers

use axum::extract::{Path, State};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, PredictBody, PredictResponse, RealtimeResponse};
use crate::domain::RealtimeRecord;

/// POST /predict
pub async fn predict(
    State(state): State<AppState>,
    Json(body): Json<PredictBody>,
) -> Result<Json<PredictResponse>, ApiError> {
    debug!(city = %body.city, "Prediction requested");

    let result = state
        .prediction_service
        .predict(body)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(PredictResponse::from(result)))
}

/// GET /realtime
pub async fn realtime(State(state): State<AppState>) -> Json<RealtimeResponse> {
    let cities = state.realtime_service.realtime().await;

    Json(RealtimeResponse { cities })
}

/// GET /realtime/{city}
pub async fn realtime_city(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<RealtimeRecord>, ApiError> {
    let record = state
        .realtime_service
        .realtime_for(city)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(record))
}
