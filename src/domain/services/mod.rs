mod query_builder;
mod rules;

pub use query_builder::*;
pub use rules::*;
