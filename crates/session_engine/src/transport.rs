//! The seam to the chat platform. The engine never talks to a network;
//! whoever wires it up implements this trait.

use async_trait::async_trait;
use thiserror::Error;

use game_core::MessageHandle;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to deliver message: {0}")]
    Delivery(String),

    #[error("unknown message handle: {0}")]
    UnknownHandle(String),
}

/// Outbound messaging operations the lifecycle controller needs.
///
/// `reply` answers the participant who issued a command (rejections,
/// confirmations); `send` posts to the channel and returns a handle that
/// `edit` can later target, which is how board games update their display.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn reply(&self, channel_id: &str, text: &str) -> Result<(), TransportError>;

    async fn send(&self, channel_id: &str, text: &str) -> Result<MessageHandle, TransportError>;

    async fn edit(
        &self,
        channel_id: &str,
        handle: &MessageHandle,
        text: &str,
    ) -> Result<(), TransportError>;
}
