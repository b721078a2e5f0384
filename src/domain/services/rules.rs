//! Synchronous validation rules.
//!
//! Each field carries an ordered list of [`FieldRule`]s; every rule is a pure
//! predicate over the current value and all failures are reported. Length
//! rules skip an empty value so a blank field reports `required` only.
//! List-level rules (cardinality, duplicates) look at the whole location list.

use chrono::{Duration, NaiveDate};

use crate::domain::{
    FieldError, FieldPath, FormState, LocationEntry, TemperatureUnit, ValidationErrorKind,
    DATE_FORMAT,
};

pub const DEFAULT_MAX_LOCATIONS: usize = 5;
pub const FORECAST_HORIZON_DAYS: i64 = 14;

const MAX_NAME_LENGTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRule {
    Required { message: &'static str },
    MinLength { min: usize, message: &'static str },
    MaxLength { max: usize, message: &'static str },
}

impl FieldRule {
    pub fn check(&self, value: &str) -> Option<ValidationErrorKind> {
        let value = value.trim();
        let len = value.chars().count();
        match self {
            FieldRule::Required { .. } if value.is_empty() => Some(ValidationErrorKind::Required),
            FieldRule::MinLength { min, .. } if len > 0 && len < *min => {
                Some(ValidationErrorKind::TooShort)
            }
            FieldRule::MaxLength { max, .. } if len > *max => Some(ValidationErrorKind::TooLong),
            _ => None,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            FieldRule::Required { message }
            | FieldRule::MinLength { message, .. }
            | FieldRule::MaxLength { message, .. } => message,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldRules {
    rules: Vec<FieldRule>,
}

impl FieldRules {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    pub fn city() -> Self {
        Self::new(vec![
            FieldRule::Required {
                message: "City is required",
            },
            FieldRule::MinLength {
                min: 2,
                message: "City must be at least 2 characters",
            },
            FieldRule::MaxLength {
                max: MAX_NAME_LENGTH,
                message: "City name is too long",
            },
        ])
    }

    pub fn country() -> Self {
        Self::new(vec![
            FieldRule::Required {
                message: "Country is required",
            },
            FieldRule::MinLength {
                min: 2,
                message: "Country must be at least 2 characters",
            },
            FieldRule::MaxLength {
                max: MAX_NAME_LENGTH,
                message: "Country name is too long",
            },
        ])
    }

    pub fn evaluate(&self, path: FieldPath, value: &str) -> Vec<FieldError> {
        self.rules
            .iter()
            .filter_map(|rule| {
                rule.check(value)
                    .map(|kind| FieldError::new(path, kind, rule.message()))
            })
            .collect()
    }
}

/// Rules for the whole form apart from the remote existence check.
#[derive(Debug, Clone)]
pub struct FormRules {
    city: FieldRules,
    country: FieldRules,
    max_locations: Option<usize>,
    horizon_days: i64,
}

impl FormRules {
    pub fn new() -> Self {
        Self {
            city: FieldRules::city(),
            country: FieldRules::country(),
            max_locations: Some(DEFAULT_MAX_LOCATIONS),
            horizon_days: FORECAST_HORIZON_DAYS,
        }
    }

    /// `None` drops the `too_many` rule.
    pub fn with_max_locations(mut self, max: Option<usize>) -> Self {
        self.max_locations = max;
        self
    }

    pub fn max_locations(&self) -> Option<usize> {
        self.max_locations
    }

    pub fn validate_entry(&self, index: usize, entry: &LocationEntry) -> Vec<FieldError> {
        let mut errors = self.city.evaluate(FieldPath::LocationCity(index), &entry.city);
        errors.extend(
            self.country
                .evaluate(FieldPath::LocationCountry(index), &entry.country),
        );
        errors
    }

    pub fn validate_cardinality(&self, len: usize) -> Option<FieldError> {
        if len == 0 {
            return Some(FieldError::new(
                FieldPath::Locations,
                ValidationErrorKind::EmptyArray,
                "At least one location is required",
            ));
        }
        match self.max_locations {
            Some(max) if len > max => Some(FieldError::new(
                FieldPath::Locations,
                ValidationErrorKind::TooMany,
                format!("Maximum {max} locations allowed"),
            )),
            _ => None,
        }
    }

    pub fn validate_date(&self, value: &str, today: NaiveDate) -> Option<FieldError> {
        let value = value.trim();
        if value.is_empty() {
            return Some(FieldError::new(
                FieldPath::Date,
                ValidationErrorKind::Required,
                "Date is required",
            ));
        }
        let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) else {
            return Some(FieldError::new(
                FieldPath::Date,
                ValidationErrorKind::InvalidDate,
                "Date must be in YYYY-MM-DD format",
            ));
        };
        if date < today {
            return Some(FieldError::new(
                FieldPath::Date,
                ValidationErrorKind::PastDate,
                "Date cannot be in the past",
            ));
        }
        if date > today + Duration::days(self.horizon_days) {
            return Some(FieldError::new(
                FieldPath::Date,
                ValidationErrorKind::FarFuture,
                format!(
                    "Weather forecasts only available for the next {} days",
                    self.horizon_days
                ),
            ));
        }
        None
    }

    pub fn validate_unit(&self, value: &str) -> Option<FieldError> {
        if value.trim().is_empty() {
            return Some(FieldError::new(
                FieldPath::TemperatureUnit,
                ValidationErrorKind::Required,
                "Temperature unit is required",
            ));
        }
        match value.parse::<TemperatureUnit>() {
            Ok(_) => None,
            Err(_) => Some(FieldError::new(
                FieldPath::TemperatureUnit,
                ValidationErrorKind::InvalidUnit,
                "Temperature unit must be celsius or fahrenheit",
            )),
        }
    }

    /// Every synchronous error of the form, list-level ones included.
    pub fn validate(&self, state: &FormState, today: NaiveDate) -> Vec<FieldError> {
        let mut errors = Vec::new();
        errors.extend(self.validate_date(&state.date, today));
        errors.extend(self.validate_cardinality(state.locations.len()));
        for (index, entry) in state.locations.iter().enumerate() {
            errors.extend(self.validate_entry(index, entry));
        }
        errors.extend(find_duplicates(&state.locations));
        errors.extend(self.validate_unit(&state.temperature_unit));
        errors
    }
}

impl Default for FormRules {
    fn default() -> Self {
        Self::new()
    }
}

/// For each entry that has an equal (normalized) entry at a higher index,
/// one `duplicate_location` error on its city field.
pub fn find_duplicates(locations: &[LocationEntry]) -> Vec<FieldError> {
    let keys: Vec<_> = locations
        .iter()
        .map(|entry| entry.is_filled().then(|| entry.key()))
        .collect();

    let mut errors = Vec::new();
    for (i, key) in keys.iter().enumerate() {
        let Some(key) = key else { continue };
        if keys[i + 1..].iter().flatten().any(|other| other == key) {
            errors.push(FieldError::new(
                FieldPath::LocationCity(i),
                ValidationErrorKind::DuplicateLocation,
                "This location has already been added",
            ));
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_blank_city_reports_required_only() {
        let errors = FieldRules::city().evaluate(FieldPath::LocationCity(0), "  ");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind(), ValidationErrorKind::Required);
        assert_eq!(errors[0].message(), "City is required");
    }

    #[test]
    fn test_length_bounds() {
        let rules = FieldRules::country();
        let short = rules.evaluate(FieldPath::LocationCountry(1), "F");
        assert_eq!(short[0].kind(), ValidationErrorKind::TooShort);

        let long = "x".repeat(51);
        let errors = rules.evaluate(FieldPath::LocationCountry(1), &long);
        assert_eq!(errors[0].kind(), ValidationErrorKind::TooLong);

        assert!(rules.evaluate(FieldPath::LocationCountry(1), "France").is_empty());
    }

    #[test]
    fn test_cardinality_boundaries() {
        let rules = FormRules::new();
        assert_eq!(
            rules.validate_cardinality(0).map(|e| e.kind()),
            Some(ValidationErrorKind::EmptyArray)
        );
        for len in 1..=5 {
            assert!(rules.validate_cardinality(len).is_none(), "len {len}");
        }
        assert_eq!(
            rules.validate_cardinality(6).map(|e| e.kind()),
            Some(ValidationErrorKind::TooMany)
        );
        assert!(rules
            .with_max_locations(None)
            .validate_cardinality(6)
            .is_none());
    }

    #[test]
    fn test_date_window() {
        let rules = FormRules::new();
        let today = day(2026, 10, 14);
        assert!(rules.validate_date("2026-10-14", today).is_none());
        assert!(rules.validate_date("2026-10-28", today).is_none());
        assert_eq!(
            rules.validate_date("2026-10-13", today).map(|e| e.kind()),
            Some(ValidationErrorKind::PastDate)
        );
        assert_eq!(
            rules.validate_date("2026-10-29", today).map(|e| e.kind()),
            Some(ValidationErrorKind::FarFuture)
        );
        assert_eq!(
            rules.validate_date("14/10/2026", today).map(|e| e.kind()),
            Some(ValidationErrorKind::InvalidDate)
        );
        assert_eq!(
            rules.validate_date("", today).map(|e| e.kind()),
            Some(ValidationErrorKind::Required)
        );
    }

    #[test]
    fn test_unit_rule() {
        let rules = FormRules::new();
        assert!(rules.validate_unit("fahrenheit").is_none());
        assert_eq!(
            rules.validate_unit("kelvin").map(|e| e.kind()),
            Some(ValidationErrorKind::InvalidUnit)
        );
        assert_eq!(
            rules.validate_unit("").map(|e| e.kind()),
            Some(ValidationErrorKind::Required)
        );
    }

    #[test]
    fn test_duplicate_reported_once_on_first_occurrence() {
        let locations = vec![
            LocationEntry::new("Paris", "France"),
            LocationEntry::new("paris", " FRANCE"),
        ];
        let errors = find_duplicates(&locations);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path(), FieldPath::LocationCity(0));
        assert_eq!(errors[0].kind(), ValidationErrorKind::DuplicateLocation);
    }

    #[test]
    fn test_duplicates_ignore_blank_entries() {
        let locations = vec![LocationEntry::default(), LocationEntry::default()];
        assert!(find_duplicates(&locations).is_empty());
    }

    #[test]
    fn test_triple_duplicate_marks_all_but_last() {
        let locations = vec![
            LocationEntry::new("Rome", "Italy"),
            LocationEntry::new("Oslo", "Norway"),
            LocationEntry::new("rome", "italy"),
            LocationEntry::new("ROME", "ITALY"),
        ];
        let paths: Vec<_> = find_duplicates(&locations)
            .iter()
            .map(|e| e.path())
            .collect();
        assert_eq!(paths, vec![FieldPath::LocationCity(0), FieldPath::LocationCity(2)]);
    }
}
