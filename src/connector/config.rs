//! Startup configuration: the two service keys.
//!
//! Read once from a JSON file shaped like
//!
//! ```json
//! { "AI_STUDIO_API_KEY": "...", "WEATHER_API_KEY": "..." }
//! ```
//!
//! with environment variables taking precedence. Missing keys are not an
//! error here; the adapters fail their calls softly instead.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_CONFIG_PATH: &str = "app-config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(rename = "AI_STUDIO_API_KEY", default)]
    pub ai_studio_api_key: Option<String>,
    #[serde(rename = "WEATHER_API_KEY", default)]
    pub weather_api_key: Option<String>,
}

impl AppConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(text)?;
        Ok(config.normalized())
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Load the file if possible, then apply environment overrides.
    /// Never fails: problems are logged and the keys stay unset.
    pub fn load_or_default(path: &Path) -> Self {
        let config = match Self::load(path) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Could not load config: {}. Continuing without it.", e);
                Self::default()
            }
        };
        config.with_env_overrides(|name| std::env::var(name).ok())
    }

    /// `AI_STUDIO_API_KEY` (or `GEMINI_API_KEY`) and `WEATHER_API_KEY`.
    pub fn with_env_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = var("AI_STUDIO_API_KEY").or_else(|| var("GEMINI_API_KEY")) {
            self.ai_studio_api_key = Some(key);
        }
        if let Some(key) = var("WEATHER_API_KEY") {
            self.weather_api_key = Some(key);
        }
        self.normalized()
    }

    pub fn has_ai_key(&self) -> bool {
        self.ai_studio_api_key.is_some()
    }

    pub fn has_weather_key(&self) -> bool {
        self.weather_api_key.is_some()
    }

    fn normalized(self) -> Self {
        Self {
            ai_studio_api_key: non_blank(self.ai_studio_api_key),
            weather_api_key: non_blank(self.weather_api_key),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
