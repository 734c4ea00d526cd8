//! Trait abstractions for runtime I/O
//!
//! The outbox is the only outbound seam: production delivers through the
//! Telegram gateway, tests record what would have been sent.

use crate::state_machine::Prompt;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Failure delivering a message to the chat platform
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Failed to send message to chat {chat_id}: {message}")]
    Send { chat_id: i64, message: String },
}

/// Delivers prompts to a chat
#[async_trait]
pub trait Outbox: Send + Sync {
    async fn send(&self, chat_id: i64, prompt: &Prompt) -> Result<(), GatewayError>;
}

#[async_trait]
impl<T: Outbox + ?Sized> Outbox for Arc<T> {
    async fn send(&self, chat_id: i64, prompt: &Prompt) -> Result<(), GatewayError> {
        (**self).send(chat_id, prompt).await
    }
}
