//! Error types for dzretour.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde_json::json;
use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
///
/// Every error carries a stable machine-readable code and maps to the flat
/// wire envelope `{ "error": <message>, "code": <CODE>, ...context }`.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("Phone number is required")]
    MissingPhone,

    #[error("Invalid Algerian mobile phone number format. Expected format: 0XXXXXXXXX")]
    InvalidPhone {
        /// Raw value the caller submitted.
        input: String,
        /// What it normalized to before failing validation.
        normalized: String,
    },

    #[error("Invalid JSON in request body")]
    InvalidJson(String),

    #[error("{0}")]
    MissingFields(String),

    #[error("Invalid reason provided")]
    InvalidReason,

    // === Policy Rejections ===
    #[error("Too many reports. Please try again later.")]
    RateLimited {
        /// When the current window expires.
        reset_time: DateTime<Utc>,
    },

    #[error("Too many check requests. Please try again later.")]
    RateLimitedCheck {
        /// When the current window expires.
        reset_time: DateTime<Utc>,
    },

    #[error("This phone number has already been reported recently")]
    DuplicateReport {
        /// Timestamp of the prior report inside the dedup window.
        last_reported: DateTime<Utc>,
    },

    // === Server Errors ===
    #[error("Database error: {0}")]
    Database(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::MissingPhone
            | Self::InvalidPhone { .. }
            | Self::InvalidJson(_)
            | Self::MissingFields(_)
            | Self::InvalidReason => StatusCode::BAD_REQUEST,
            Self::RateLimited { .. } | Self::RateLimitedCheck { .. } => {
                StatusCode::TOO_MANY_REQUESTS
            }
            Self::DuplicateReport { .. } => StatusCode::CONFLICT,

            // 5xx Server Errors
            Self::Database(_) | Self::ExternalService(_) | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the stable error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingPhone => "MISSING_PHONE",
            Self::InvalidPhone { .. } => "INVALID_PHONE",
            Self::InvalidJson(_) => "INVALID_JSON",
            Self::MissingFields(_) => "MISSING_FIELDS",
            Self::InvalidReason => "INVALID_REASON",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::RateLimitedCheck { .. } => "RATE_LIMITED_CHECK",
            Self::DuplicateReport { .. } => "DUPLICATE_REPORT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        if self.is_server_error() {
            tracing::error!(error = %self, code = code, "Server error occurred");
        } else if let Self::InvalidPhone { input, normalized } = &self {
            // Diagnostics stay in the logs, not in the envelope.
            tracing::debug!(
                error = %self,
                code = code,
                input = %input,
                normalized = %normalized,
                "Client error occurred"
            );
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
        }

        // 5xx detail never leaks to the caller.
        let (code, message) = if status.is_server_error() {
            ("INTERNAL_ERROR", "Internal server error".to_string())
        } else {
            (code, self.to_string())
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });

        match &self {
            Self::RateLimited { reset_time } | Self::RateLimitedCheck { reset_time } => {
                body["resetTime"] = json!(reset_time.timestamp_millis());
            }
            Self::DuplicateReport { last_reported } => {
                body["lastReported"] = json!(last_reported.to_rfc3339());
            }
            _ => {}
        }

        (status, Json(body)).into_response()
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::MissingFields(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(AppError::MissingPhone.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::RateLimited {
                reset_time: Utc::now()
            }
            .status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::DuplicateReport {
                last_reported: Utc::now()
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Database("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(AppError::MissingPhone.error_code(), "MISSING_PHONE");
        assert_eq!(AppError::InvalidReason.error_code(), "INVALID_REASON");
        assert_eq!(
            AppError::RateLimitedCheck {
                reset_time: Utc::now()
            }
            .error_code(),
            "RATE_LIMITED_CHECK"
        );
        assert_eq!(
            AppError::InvalidJson("bad".to_string()).error_code(),
            "INVALID_JSON"
        );
    }

    #[test]
    fn server_errors_are_flagged() {
        assert!(AppError::Internal("x".to_string()).is_server_error());
        assert!(!AppError::InvalidReason.is_server_error());
    }

    #[tokio::test]
    #[allow(clippy::unwrap_used)]
    async fn invalid_phone_envelope_omits_diagnostics() {
        let response = AppError::InvalidPhone {
            input: "+213 2551 23456".to_string(),
            normalized: "0255123456".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "INVALID_PHONE");
        assert!(body["error"].is_string());
        // The submitted value and its normalized form never leave the logs.
        assert!(body.get("input").is_none());
        assert!(body.get("normalized").is_none());
    }
}
