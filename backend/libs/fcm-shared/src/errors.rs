use serde::ser::{Serialize, SerializeStruct, Serializer};
use thiserror::Error;

/// FCM Client Error Types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FCMError {
    #[error("Failed to read service account file: {0}")]
    CredentialFileError(String),

    #[error("Failed to parse private key: {0}")]
    KeyParseError(String),

    #[error("Failed to encode JWT: {0}")]
    JwtEncodeError(String),

    #[error("Failed to get access token: {0}")]
    TokenError(String),

    #[error("Token request failed with status: {0}")]
    TokenRequestFailed(String),

    #[error("Failed to parse token response: {0}")]
    TokenParseError(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("FCM send request failed: {0}")]
    SendRequestError(String),

    #[error("Failed to parse FCM response: {0}")]
    ResponseParseError(String),

    /// Error reported by the FCM API. Holds the code suffix and the API message.
    #[error("{1}")]
    ApiError(String, String),
}

impl FCMError {
    /// Stable, namespaced error code, e.g. `messaging/invalid-argument`.
    pub fn code(&self) -> String {
        match self {
            FCMError::CredentialFileError(_)
            | FCMError::KeyParseError(_)
            | FCMError::JwtEncodeError(_)
            | FCMError::TokenError(_)
            | FCMError::TokenRequestFailed(_)
            | FCMError::TokenParseError(_) => "app/invalid-credential".to_string(),
            FCMError::InvalidArgument(_) => "messaging/invalid-argument".to_string(),
            FCMError::SendRequestError(_) => "messaging/app-error".to_string(),
            FCMError::ResponseParseError(_) => "messaging/unknown-error".to_string(),
            FCMError::ApiError(code, _) => format!("messaging/{}", code),
        }
    }
}

/// Errors go over the wire as `{"code": ..., "message": ...}`.
impl Serialize for FCMError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FCMError", 2)?;
        state.serialize_field("code", &self.code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Maps an FCM v1 error code (`errorCode` detail or `status`) to its code suffix.
pub(crate) fn code_for_fcm_error(fcm_code: &str) -> Option<&'static str> {
    match fcm_code {
        "UNREGISTERED" | "NOT_FOUND" => Some("registration-token-not-registered"),
        "INVALID_ARGUMENT" => Some("invalid-argument"),
        "SENDER_ID_MISMATCH" | "PERMISSION_DENIED" => Some("mismatched-credential"),
        "QUOTA_EXCEEDED" | "RESOURCE_EXHAUSTED" => Some("message-rate-exceeded"),
        "UNAVAILABLE" => Some("server-unavailable"),
        "INTERNAL" => Some("internal-error"),
        "THIRD_PARTY_AUTH_ERROR" | "APNS_AUTH_ERROR" | "UNAUTHENTICATED" => {
            Some("third-party-auth-error")
        }
        _ => None,
    }
}

/// Fallback used when the error body carries no recognised code.
pub(crate) fn code_for_http_status(status: u16) -> &'static str {
    match status {
        400 => "invalid-argument",
        401 | 403 => "authentication-error",
        404 => "registration-token-not-registered",
        429 => "message-rate-exceeded",
        500 => "internal-error",
        503 => "server-unavailable",
        _ => "unknown-error",
    }
}
