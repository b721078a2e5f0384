use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::application::LocationLookup;
use crate::domain::{DomainError, LocationMatch};

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com";
const SEARCH_PATH: &str = "/v1/search.json";

/// Client for the weather-data provider's city search endpoint.
///
/// `GET {base}/v1/search.json?key=..&q=City,Country` returns a JSON array of
/// candidate places. Without an API key every search fails immediately, which
/// the checker reports as "city not found" rather than crashing.
pub struct WeatherApiLookup {
    client: reqwest::Client,
    api_key: Option<String>,
    url: String,
}

impl WeatherApiLookup {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        let base: String = base_url.into();
        let url = format!("{}{}", base.trim_end_matches('/'), SEARCH_PATH);
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            url,
        }
    }

    pub fn with_default_base(api_key: Option<String>) -> Self {
        Self::new(api_key, DEFAULT_BASE_URL)
    }

    pub fn has_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl LocationLookup for WeatherApiLookup {
    async fn search(&self, city: &str, country: &str) -> Result<Vec<LocationMatch>, DomainError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(DomainError::lookup("weather lookup key is not configured"));
        };

        let q = format!("{},{}", city.trim(), country.trim());
        debug!("WeatherApiLookup: searching {q}");

        let response = self
            .client
            .get(&self.url)
            .query(&[("key", api_key), ("q", q.as_str())])
            .send()
            .await
            .map_err(|e| DomainError::lookup(format!("WeatherApiLookup: request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("WeatherApiLookup: API returned {status}: {body}");
            return Err(DomainError::lookup(format!(
                "WeatherApiLookup: API returned {status}"
            )));
        }

        response.json::<Vec<LocationMatch>>().await.map_err(|e| {
            DomainError::lookup(format!("WeatherApiLookup: failed to parse response: {e}"))
        })
    }
}
