pub mod ask_controller;
pub mod chat_controller;
pub mod interactive_controller;
pub mod validate_controller;

pub use ask_controller::AskController;
pub use chat_controller::ChatController;
pub use interactive_controller::InteractiveController;
pub use validate_controller::ValidateController;
