use anyhow::Result;

use crate::application::SubmitOutcome;

use super::super::Container;

pub struct AskController<'a> {
    container: &'a Container,
}

impl<'a> AskController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn ask(
        &self,
        locations: Vec<String>,
        date: Option<String>,
        unit: String,
    ) -> Result<String> {
        let mut form = self.container.form_from_args(&locations, date, unit);
        form.settle().await;

        let outcome = self.container.submit_use_case().execute(&mut form).await?;
        Ok(format_outcome(&outcome))
    }
}

pub(crate) fn format_outcome(outcome: &SubmitOutcome) -> String {
    match outcome {
        SubmitOutcome::Blocked { errors, pending } => {
            let mut output = String::from("Cannot submit, please fix the following:\n");
            for error in errors {
                output.push_str(&format!("  {}\n", error));
            }
            if *pending {
                output.push_str("  (some locations are still being checked)\n");
            }
            output.trim_end().to_string()
        }
        SubmitOutcome::Answered { query, reply } => {
            let mut output = format!("You: {}\n\nAssistant: {}", query, reply.response);
            if let Some(usage) = reply.usage {
                output.push_str(&format!("\n\n[tokens: {} total]", usage.total_token_count));
            }
            output
        }
    }
}
