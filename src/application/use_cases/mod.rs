mod entry_session;
mod existence_checker;
mod list_coordinator;
mod submit_query;
mod weather_chat;

pub use entry_session::*;
pub use existence_checker::*;
pub use list_coordinator::*;
pub use submit_query::*;
pub use weather_chat::*;
