/// Error types for the relay service
///
/// Provider failures are reported as 500 with the provider's error object;
/// request bodies that cannot be decoded at all are reported as 400.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use fcm_shared::FCMError;
use thiserror::Error;

use crate::models::{ApiResponse, ErrorBody};

/// Result type for relay-service operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Request body is not valid JSON (or form data) for the endpoint
    #[error("Invalid request body: {0}")]
    InvalidPayload(String),

    /// Startup configuration is unusable
    #[error("Configuration error: {0}")]
    Config(String),

    /// Messaging provider rejected or failed the send
    #[error(transparent)]
    Provider(#[from] FCMError),
}

impl AppError {
    fn body(&self) -> ErrorBody {
        match self {
            AppError::Provider(err) => ErrorBody::from(err),
            AppError::InvalidPayload(msg) => ErrorBody {
                code: "relay/invalid-body".to_string(),
                message: msg.clone(),
            },
            AppError::Config(msg) => ErrorBody {
                code: "relay/config-error".to_string(),
                message: msg.clone(),
            },
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_) | AppError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ApiResponse::<()>::err(self.body()))
    }
}
