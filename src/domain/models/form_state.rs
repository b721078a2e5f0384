use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::LocationEntry;
use crate::domain::DomainError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemperatureUnit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "celsius" => Ok(TemperatureUnit::Celsius),
            "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            other => Err(DomainError::invalid_input(format!(
                "unknown temperature unit: {other}"
            ))),
        }
    }
}

/// The mutable record every validation pass and the submit action read.
///
/// `temperature_unit` holds the raw text the user chose so that an
/// unrecognised value can be reported instead of rejected at the edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormState {
    pub date: String,
    pub locations: Vec<LocationEntry>,
    pub temperature_unit: String,
}

impl FormState {
    pub fn new(date: impl Into<String>, locations: Vec<LocationEntry>, unit: TemperatureUnit) -> Self {
        Self {
            date: date.into(),
            locations,
            temperature_unit: unit.as_str().to_string(),
        }
    }

    /// Today's date, a single blank location, celsius.
    pub fn for_today(today: NaiveDate) -> Self {
        Self::new(
            today.format(DATE_FORMAT).to_string(),
            vec![LocationEntry::default()],
            TemperatureUnit::Celsius,
        )
    }

    pub fn unit(&self) -> Option<TemperatureUnit> {
        self.temperature_unit.parse().ok()
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).ok()
    }

    pub fn add_location(&mut self) {
        self.locations.push(LocationEntry::default());
    }

    pub fn remove_location(&mut self, index: usize) -> Result<LocationEntry, DomainError> {
        if index >= self.locations.len() {
            return Err(out_of_range(index, self.locations.len()));
        }
        Ok(self.locations.remove(index))
    }

    pub fn location_mut(&mut self, index: usize) -> Result<&mut LocationEntry, DomainError> {
        let len = self.locations.len();
        self.locations
            .get_mut(index)
            .ok_or_else(|| out_of_range(index, len))
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::for_today(Local::now().date_naive())
    }
}

fn out_of_range(index: usize, len: usize) -> DomainError {
    DomainError::invalid_input(format!(
        "location index {index} out of range (list has {len} entries)"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_form_has_one_blank_location() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        let state = FormState::for_today(today);
        assert_eq!(state.date, "2026-10-14");
        assert_eq!(state.locations, vec![LocationEntry::default()]);
        assert_eq!(state.unit(), Some(TemperatureUnit::Celsius));
    }

    #[test]
    fn test_unit_parsing() {
        assert_eq!("Fahrenheit".parse::<TemperatureUnit>().unwrap(), TemperatureUnit::Fahrenheit);
        assert_eq!(" celsius ".parse::<TemperatureUnit>().unwrap(), TemperatureUnit::Celsius);
        assert!("c".parse::<TemperatureUnit>().is_err());
        assert!("kelvin".parse::<TemperatureUnit>().is_err());
    }

    #[test]
    fn test_remove_location_out_of_range() {
        let mut state = FormState::for_today(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        let err = state.remove_location(3).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(state.remove_location(0).is_ok());
        assert!(state.locations.is_empty());
    }
}
