/// FCM Shared Library
///
/// This library provides the Firebase Cloud Messaging (FCM) client used by the
/// push relay to deliver notifications to devices and topics.
///
/// It handles:
/// - Service account loading and OAuth2 token generation
/// - Token caching with automatic refresh
/// - Single, topic and multicast message delivery over the FCM HTTP v1 API
/// - Mapping FCM API failures to stable error codes

pub mod client;
pub mod errors;
pub mod models;
pub mod provider;

pub use client::{FCMClient, FCM_ENDPOINT, MAX_MULTICAST_TOKENS};
pub use errors::FCMError;
pub use models::{
    BatchResponse, Message, MulticastMessage, Notification, SendResponse, ServiceAccountKey,
};
pub use provider::MessagingProvider;
