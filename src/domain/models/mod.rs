mod chat;
mod form_state;
mod location;
mod validation;

pub use chat::*;
pub use form_state::*;
pub use location::*;
pub use validation::*;
