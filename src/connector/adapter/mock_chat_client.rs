use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::application::ChatClient;
use crate::domain::{ChatReply, ChatTurn, DomainError, TemperatureUnit};

const CONDITIONS: &[&str] = &[
    "Sunny",
    "Partly cloudy",
    "Overcast",
    "Light rain",
    "Showers",
    "Thunderstorms",
    "Foggy",
    "Clear skies",
];

const WIND_DIRECTIONS: &[&str] = &["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Offline stand-in for the assistant.
///
/// Synthesises a short forecast from fixed vocabularies. The same message
/// always yields the same reply; the unit follows the `°C`/`°F` the query
/// asks for.
pub struct MockChatClient;

impl MockChatClient {
    pub fn new() -> Self {
        Self
    }

    fn seed(message: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        message.hash(&mut hasher);
        hasher.finish()
    }

    fn unit_of(message: &str) -> TemperatureUnit {
        if message.contains("°F") {
            TemperatureUnit::Fahrenheit
        } else {
            TemperatureUnit::Celsius
        }
    }

    fn compose(message: &str) -> String {
        let mut rng = StdRng::seed_from_u64(Self::seed(message));

        let celsius: i32 = rng.gen_range(-5..=35);
        let unit = Self::unit_of(message);
        let temperature = match unit {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 9 / 5 + 32,
        };
        let condition = CONDITIONS.choose(&mut rng).copied().unwrap_or("Clear skies");
        let humidity: u32 = rng.gen_range(20..=95);
        let wind_speed: u32 = rng.gen_range(0..=40);
        let wind_direction = WIND_DIRECTIONS.choose(&mut rng).copied().unwrap_or("N");

        format!(
            "Here's the expected weather:\n\
             - Temperature: {temperature}{}\n\
             - Conditions: {condition}\n\
             - Humidity: {humidity}%\n\
             - Wind: {wind_speed} km/h {wind_direction}\n\n\
             (This is a simulated forecast; the assistant is currently unavailable.)",
            unit.symbol()
        )
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn send(&self, message: &str, history: &[ChatTurn]) -> Result<ChatReply, DomainError> {
        debug!(
            "Synthesising mock reply ({} prior turns)",
            history.len()
        );
        Ok(ChatReply::new(Self::compose(message)))
    }

    fn name(&self) -> &str {
        "MockChatClient"
    }
}
