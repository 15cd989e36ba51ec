use thiserror::Error;

/// Core domain errors
///
/// Errors are `Clone` so that a failed model warm-up can be memoized and
/// handed to every later caller of the same cache key.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Missing field: {field}")]
    MissingField { field: String },

    #[error("Invalid regressor: {message}")]
    InvalidRegressor { message: String },

    #[error("Model load error: {path} - {message}")]
    ModelLoad { path: String, message: String },

    #[error("Reference data error: {path} - {message}")]
    ReferenceData { path: String, message: String },

    #[error("Warm fit error: {message}")]
    WarmFit { message: String },

    #[error("Insufficient history: {required} rows required, {available} available")]
    InsufficientHistory { required: usize, available: usize },

    #[error("Unknown city: {city}")]
    UnknownCity { city: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn invalid_regressor(message: impl Into<String>) -> Self {
        Self::InvalidRegressor {
            message: message.into(),
        }
    }

    pub fn model_load(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ModelLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn reference_data(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ReferenceData {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn warm_fit(message: impl Into<String>) -> Self {
        Self::WarmFit {
            message: message.into(),
        }
    }

    pub fn insufficient_history(required: usize, available: usize) -> Self {
        Self::InsufficientHistory {
            required,
            available,
        }
    }

    pub fn unknown_city(city: impl Into<String>) -> Self {
        Self::UnknownCity { city: city.into() }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the error comes from a broken model artifact or reference
    /// dataset rather than from the request itself.
    pub fn is_model_failure(&self) -> bool {
        matches!(
            self,
            Self::ModelLoad { .. } | Self::ReferenceData { .. } | Self::WarmFit { .. }
        )
    }
}
