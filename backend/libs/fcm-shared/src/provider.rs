use async_trait::async_trait;

use crate::client::FCMClient;
use crate::errors::FCMError;
use crate::models::{BatchResponse, Message, MulticastMessage};

/// Trait for push messaging backends
#[async_trait]
pub trait MessagingProvider: Send + Sync {
    /// Sends a single message addressed to a device token or topic.
    ///
    /// # Returns
    /// The provider's receipt (FCM message name) on success
    async fn send(&self, message: &Message) -> Result<String, FCMError>;

    /// Sends one notification to every token of a multicast message in a
    /// single call, returning the per-token outcomes.
    async fn send_multicast(&self, message: &MulticastMessage)
        -> Result<BatchResponse, FCMError>;
}

#[async_trait]
impl MessagingProvider for FCMClient {
    async fn send(&self, message: &Message) -> Result<String, FCMError> {
        self.send_message(message).await
    }

    async fn send_multicast(
        &self,
        message: &MulticastMessage,
    ) -> Result<BatchResponse, FCMError> {
        self.send_each_for_multicast(message).await
    }
}
