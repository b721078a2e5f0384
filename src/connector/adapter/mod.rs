mod gemini_client;
pub mod http_relay;
mod in_memory_result_cache;
mod mock_chat_client;
mod weather_api_lookup;

pub use gemini_client::GeminiChatClient;
pub use http_relay::RelayState;
pub use in_memory_result_cache::*;
pub use mock_chat_client::*;
pub use weather_api_lookup::WeatherApiLookup;
