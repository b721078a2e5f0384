use anyhow::Result;

use crate::Commands;

use super::container::Container;
use super::controller::{AskController, ChatController, InteractiveController, ValidateController};

pub struct Router<'a> {
    validate_controller: ValidateController<'a>,
    ask_controller: AskController<'a>,
    chat_controller: ChatController<'a>,
    interactive_controller: InteractiveController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            validate_controller: ValidateController::new(container),
            ask_controller: AskController::new(container),
            chat_controller: ChatController::new(container),
            interactive_controller: InteractiveController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Validate {
                locations,
                date,
                unit,
                json,
            } => {
                self.validate_controller
                    .validate(locations, date, unit, json)
                    .await
            }
            Commands::Ask {
                locations,
                date,
                unit,
            } => self.ask_controller.ask(locations, date, unit).await,
            Commands::Chat { message } => self.chat_controller.chat(message).await,
            Commands::Interactive => self.interactive_controller.run().await,
            Commands::Serve { .. } => unreachable!("Serve command is handled separately in main"),
        }
    }
}
