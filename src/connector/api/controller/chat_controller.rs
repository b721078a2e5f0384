use anyhow::Result;

use super::super::Container;

pub struct ChatController<'a> {
    container: &'a Container,
}

impl<'a> ChatController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn chat(&self, message: String) -> Result<String> {
        if message.trim().is_empty() {
            anyhow::bail!("Message is required");
        }
        let reply = self.container.chat_service().send_message(&message).await;
        Ok(reply.response)
    }
}
