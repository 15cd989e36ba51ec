//! JSON error bodies: `{"error": {"message", "type", "code"}}`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    InvalidRequestError,
    ServerError,
    ServiceUnavailableError,
}

impl std::fmt::Display for ApiErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequestError => write!(f, "invalid_request_error"),
            Self::ServerError => write!(f, "server_error"),
            Self::ServiceUnavailableError => write!(f, "service_unavailable_error"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ApiErrorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, error_type: ApiErrorType, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: ApiErrorDetail {
                    message: message.into(),
                    error_type,
                    param: None,
                    code: None,
                },
            },
        }
    }

    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.response.error.param = Some(param.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.response.error.code = Some(code.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorType::InvalidRequestError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ApiErrorType::ServerError, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            ApiErrorType::ServiceUnavailableError,
            message,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let message = err.to_string();

        match &err {
            DomainError::MissingField { field } => Self::bad_request(message)
                .with_param(field.clone())
                .with_code("missing_field"),
            DomainError::InvalidRegressor { .. } => {
                Self::bad_request(message).with_code("invalid_regressor")
            }
            DomainError::UnknownCity { .. } => Self::bad_request(message)
                .with_param("city")
                .with_code("unknown_city"),
            DomainError::Provider { .. } => Self::unavailable(message).with_code("provider_error"),
            DomainError::ModelLoad { .. } => Self::internal(message).with_code("model_load_error"),
            DomainError::ReferenceData { .. } => {
                Self::internal(message).with_code("reference_data_error")
            }
            DomainError::WarmFit { .. } => Self::internal(message).with_code("warm_fit_error"),
            DomainError::InsufficientHistory { .. } => {
                Self::internal(message).with_code("insufficient_history")
            }
            DomainError::Configuration { .. } => {
                Self::internal(message).with_code("configuration_error")
            }
            DomainError::Internal { .. } => Self::internal(message).with_code("internal_error"),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.response.error.error_type, self.response.error.message
        )
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_bad_request() {
        let cases = [
            DomainError::missing_field("current.humidity"),
            DomainError::invalid_regressor("T must be a finite number"),
            DomainError::unknown_city("Paris"),
        ];

        for err in cases {
            let api_err = ApiError::from(err);
            assert_eq!(api_err.status, StatusCode::BAD_REQUEST);
            assert_eq!(api_err.response.error.error_type, ApiErrorType::InvalidRequestError);
        }
    }

    #[test]
    fn test_provider_error_is_unavailable() {
        let api_err = ApiError::from(DomainError::provider("weatherapi", "HTTP 502"));

        assert_eq!(api_err.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(api_err.response.error.code.as_deref(), Some("provider_error"));
    }

    #[test]
    fn test_model_failures_are_server_errors() {
        let cases = [
            DomainError::model_load("m.json", "cannot read"),
            DomainError::reference_data("ref.csv", "missing column"),
            DomainError::warm_fit("diverged"),
            DomainError::insufficient_history(48, 3),
            DomainError::internal("non-finite forecast"),
        ];

        for err in cases {
            assert_eq!(
                ApiError::from(err).status,
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }

    #[test]
    fn test_missing_field_carries_param() {
        let api_err = ApiError::from(DomainError::missing_field("current.temp_c"));
        assert_eq!(api_err.response.error.param.as_deref(), Some("current.temp_c"));
    }

    #[test]
    fn test_error_serialization() {
        let err = ApiError::unavailable("provider down").with_code("provider_error");
        let json = serde_json::to_value(&err.response).unwrap();

        assert_eq!(json["error"]["type"], "service_unavailable_error");
        assert_eq!(json["error"]["message"], "provider down");
        assert_eq!(json["error"]["code"], "provider_error");
        assert!(json["error"].get("param").is_none());
    }
}
