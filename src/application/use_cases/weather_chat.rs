use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::application::ChatClient;
use crate::domain::{ChatReply, ChatTurn};

const APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

/// Conversation with the assistant, keeping history between messages.
///
/// Never fails: when the primary client errors the reply comes from the
/// fallback client, and if that errors as well a fixed apology is shown.
pub struct WeatherChatService {
    primary: Arc<dyn ChatClient>,
    fallback: Arc<dyn ChatClient>,
    history: Mutex<Vec<ChatTurn>>,
}

impl WeatherChatService {
    pub fn new(primary: Arc<dyn ChatClient>, fallback: Arc<dyn ChatClient>) -> Self {
        Self {
            primary,
            fallback,
            history: Mutex::new(Vec::new()),
        }
    }

    pub async fn send_message(&self, message: &str) -> ChatReply {
        let mut history = self.history.lock().await;

        let reply = match self.primary.send(message, &history).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(
                    "{} failed: {}. Falling back to {}.",
                    self.primary.name(),
                    e,
                    self.fallback.name()
                );
                match self.fallback.send(message, &history).await {
                    Ok(reply) => reply.synthesized(),
                    Err(e) => {
                        warn!("{} failed as well: {}", self.fallback.name(), e);
                        ChatReply::new(APOLOGY).synthesized()
                    }
                }
            }
        };

        if let Some(usage) = reply.usage {
            info!(
                "Chat usage: {} prompt, {} completion, {} total tokens",
                usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
            );
        }

        history.push(ChatTurn::user(message));
        history.push(ChatTurn::model(reply.response.clone()));
        reply
    }

    pub async fn clear_history(&self) {
        self.history.lock().await.clear();
    }

    pub async fn history(&self) -> Vec<ChatTurn> {
        self.history.lock().await.clone()
    }
}
