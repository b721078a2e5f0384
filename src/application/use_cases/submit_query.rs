use std::sync::Arc;

use tracing::info;

use super::{ListValidationCoordinator, WeatherChatService};
use crate::domain::{build_weather_query, ChatReply, DomainError, FieldError};

#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// The form was not valid; every field is now marked touched.
    Blocked { errors: Vec<FieldError>, pending: bool },
    Answered { query: String, reply: ChatReply },
}

/// Use case for submitting the weather form to the assistant.
pub struct SubmitWeatherQueryUseCase {
    chat: Arc<WeatherChatService>,
}

impl SubmitWeatherQueryUseCase {
    pub fn new(chat: Arc<WeatherChatService>) -> Self {
        Self { chat }
    }

    pub async fn execute(
        &self,
        form: &mut ListValidationCoordinator,
    ) -> Result<SubmitOutcome, DomainError> {
        form.poll_completions();
        let report = form.report();

        if !report.is_valid() {
            form.mark_all_touched();
            info!(
                "Submit blocked: {} errors, pending checks: {}",
                report.errors().len(),
                report.has_pending()
            );
            return Ok(SubmitOutcome::Blocked {
                errors: form.visible_errors(),
                pending: report.has_pending(),
            });
        }

        let query = build_weather_query(form.state())?;
        info!("Submitting query: {}", query);
        let reply = self.chat.send_message(&query).await;

        Ok(SubmitOutcome::Answered { query, reply })
    }
}
