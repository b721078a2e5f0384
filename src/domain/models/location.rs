use std::fmt;

use serde::{Deserialize, Serialize};

/// Shortest city or country text that is worth asking the remote service about.
pub const MIN_LOOKUP_LENGTH: usize = 2;

/// One row of the location list. Identity is positional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationEntry {
    pub city: String,
    pub country: String,
}

impl LocationEntry {
    pub fn new(city: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            country: country.into(),
        }
    }

    /// Parse the `City,Country` form used on the command line.
    ///
    /// The split happens on the last comma so a city such as
    /// `Washington, D.C.,United States` keeps its own comma.
    pub fn parse(text: &str) -> Self {
        match text.rsplit_once(',') {
            Some((city, country)) => Self::new(city.trim(), country.trim()),
            None => Self::new(text.trim(), ""),
        }
    }

    pub fn key(&self) -> ValidationKey {
        ValidationKey::normalize(&self.city, &self.country)
    }

    /// Both parts present (after trimming).
    pub fn is_filled(&self) -> bool {
        !self.city.trim().is_empty() && !self.country.trim().is_empty()
    }
}

impl fmt::Display for LocationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.city.trim(), self.country.trim())
    }
}

/// Normalized (city, country) pair used as the cache key, the staleness
/// identity of a check, and the duplicate relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValidationKey {
    city: String,
    country: String,
}

impl ValidationKey {
    /// Trim and lowercase both parts, whatever their length.
    pub fn normalize(city: &str, country: &str) -> Self {
        Self {
            city: normalize_part(city),
            country: normalize_part(country),
        }
    }

    /// Normalized key, or `None` while either part is too short to look up.
    pub fn complete(city: &str, country: &str) -> Option<Self> {
        let key = Self::normalize(city, country);
        key.is_complete().then_some(key)
    }

    pub fn is_complete(&self) -> bool {
        self.city.chars().count() >= MIN_LOOKUP_LENGTH
            && self.country.chars().count() >= MIN_LOOKUP_LENGTH
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    /// Whether a remote record names exactly this place.
    pub fn matches(&self, record: &LocationMatch) -> bool {
        normalize_part(&record.name) == self.city && normalize_part(&record.country) == self.country
    }
}

impl fmt::Display for ValidationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.city, self.country)
    }
}

fn normalize_part(part: &str) -> String {
    part.trim().to_lowercase()
}

/// A candidate place returned by the weather-data search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationMatch {
    pub name: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

impl LocationMatch {
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            region: None,
            lat: None,
            lon: None,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}
