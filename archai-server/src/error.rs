//! API error handling module
//!
//! Provides a unified error type for all API endpoints with structured error variants.

use archai_core::{persistence_message, ArchError, ImageFault};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// API error type with structured variants for different error categories
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request - client provided invalid input
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error - unexpected server-side failure
    #[error("Internal error: {0}")]
    Internal(String),

    /// Classification pipeline error
    #[error("Classifier error: {0}")]
    Arch(#[from] ArchError),
}

impl ApiError {
    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create an internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// The request carried no image
    pub fn missing_image() -> Self {
        Self::Arch(ArchError::InvalidImage(ImageFault::Missing))
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Arch(ref e) => match e {
                ArchError::InvalidImage(_) => StatusCode::BAD_REQUEST,
                ArchError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                ArchError::Inference(_)
                | ArchError::CatalogMismatch { .. }
                | ArchError::LabelIndex(_)
                | ArchError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Get the error code for programmatic error handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "INVALID_INPUT",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Arch(ref e) => match e {
                ArchError::InvalidImage(ImageFault::Missing) => "NO_IMAGE",
                ArchError::InvalidImage(_) => "INVALID_IMAGE",
                ArchError::ModelUnavailable(_) => "MODEL_UNAVAILABLE",
                ArchError::Inference(_) => "INFERENCE_FAILED",
                ArchError::CatalogMismatch { .. } => "CATALOG_MISMATCH",
                ArchError::LabelIndex(_) => "LABEL_INDEX_INVALID",
                ArchError::Persistence(_) => "FEEDBACK_WRITE_FAILED",
            },
        }
    }

    /// Get sanitized error message for client response
    pub fn client_message(&self) -> String {
        match self {
            // Pipeline errors map to the fixed user-facing texts
            Self::Arch(e @ ArchError::Persistence(_)) => persistence_message(e),
            Self::Arch(e) => e.user_message().to_string(),
            _ => self.to_string(),
        }
    }

    /// Get the error category for logging
    fn error_category(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Internal(_) => "internal",
            Self::Arch(_) => "classifier",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let category = self.error_category();
        let code = self.error_code();
        let internal_message = self.to_string();
        let client_message = self.client_message();

        // Log based on severity, always including internal details
        match &self {
            Self::BadRequest(_) | Self::Arch(ArchError::InvalidImage(_)) => {
                tracing::warn!(
                    status = %status,
                    category = category,
                    code = code,
                    error = %internal_message,
                    "Client error"
                );
            }
            Self::Arch(e) if e.is_fatal() => {
                tracing::error!(
                    status = %status,
                    category = category,
                    code = code,
                    error = %internal_message,
                    "Classifier configuration error"
                );
            }
            Self::Internal(_) | Self::Arch(_) => {
                tracing::error!(
                    status = %status,
                    category = category,
                    code = code,
                    error = %internal_message,
                    client_message = %client_message,
                    "Server error"
                );
            }
        }

        // All error responses include a `code` field for programmatic error handling
        let body = serde_json::json!({
            "error": client_message,
            "code": code,
        });

        (status, Json(body)).into_response()
    }
}
