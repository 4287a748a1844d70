//! Chat history persistence, consumed as an external collaborator.

use async_trait::async_trait;

use super::{ChatMessage, StoreError};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Durably append one message.
    async fn append(&self, message: &ChatMessage) -> Result<(), StoreError>;

    /// The most recent `limit` messages, oldest first.
    async fn recent(&self, limit: usize) -> Result<Vec<ChatMessage>, StoreError>;
}
