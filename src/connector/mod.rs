//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Location lookup against the weather-data search API
//! - Chat backends (Gemini, plus an offline mock)
//! - The in-memory result cache
//! - The HTTP relay, startup config, and the CLI wiring

pub mod adapter;
pub mod api;
pub mod config;

pub use adapter::*;
pub use config::{AppConfig, ConfigError};
