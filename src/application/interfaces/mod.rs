mod chat_client;
mod location_lookup;
mod result_cache;

pub use chat_client::*;
pub use location_lookup::*;
pub use result_cache::*;
