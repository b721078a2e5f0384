use async_trait::async_trait;

use crate::domain::{ChatReply, ChatTurn, DomainError};

/// An interface for sending a message, with prior turns, to a conversational
/// model and receiving its reply.
///
/// Implementors encapsulate transport, serialization, and vendor-specific API
/// details so the chat service stays decoupled from any particular provider.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn send(&self, message: &str, history: &[ChatTurn]) -> Result<ChatReply, DomainError>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}
