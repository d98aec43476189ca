/// Request and response shapes for the relay endpoints
///
/// Request fields are kept as raw JSON values: the relay forwards whatever the
/// caller sent, of whatever type, and leaves judging the message to the
/// messaging provider.
use fcm_shared::{FCMError, Message, MulticastMessage};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// POST /send-to-device
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendToDeviceRequest {
    pub token: Option<Value>,
    pub notification: Option<Value>,
}

impl From<SendToDeviceRequest> for Message {
    fn from(req: SendToDeviceRequest) -> Self {
        Message {
            token: req.token,
            topic: None,
            notification: req.notification,
        }
    }
}

/// POST /send-to-multiple
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendToMultipleRequest {
    pub tokens: Option<Value>,
    pub notification: Option<Value>,
}

impl From<SendToMultipleRequest> for MulticastMessage {
    fn from(req: SendToMultipleRequest) -> Self {
        MulticastMessage {
            tokens: req.tokens,
            notification: req.notification,
        }
    }
}

/// POST /send-to-topic
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendToTopicRequest {
    pub topic: Option<Value>,
    pub notification: Option<Value>,
}

impl From<SendToTopicRequest> for Message {
    fn from(req: SendToTopicRequest) -> Self {
        Message {
            token: None,
            topic: req.topic,
            notification: req.notification,
        }
    }
}

/// Error object returned to callers: `{"code": ..., "message": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl From<&FCMError> for ErrorBody {
    fn from(err: &FCMError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(response: T) -> Self {
        Self {
            success: true,
            response: Some(response),
            error: None,
        }
    }

    pub fn err(error: ErrorBody) -> Self {
        Self {
            success: false,
            response: None,
            error: Some(error),
        }
    }
}
