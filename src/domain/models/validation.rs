use std::fmt;

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    Required,
    TooShort,
    TooLong,
    CityNotFound,
    CityCountryMismatch,
    DuplicateLocation,
    EmptyArray,
    TooMany,
    PastDate,
    FarFuture,
    InvalidDate,
    InvalidUnit,
}

impl ValidationErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationErrorKind::Required => "required",
            ValidationErrorKind::TooShort => "too_short",
            ValidationErrorKind::TooLong => "too_long",
            ValidationErrorKind::CityNotFound => "city_not_found",
            ValidationErrorKind::CityCountryMismatch => "city_country_mismatch",
            ValidationErrorKind::DuplicateLocation => "duplicate_location",
            ValidationErrorKind::EmptyArray => "empty_array",
            ValidationErrorKind::TooMany => "too_many",
            ValidationErrorKind::PastDate => "past_date",
            ValidationErrorKind::FarFuture => "far_future",
            ValidationErrorKind::InvalidDate => "invalid_date",
            ValidationErrorKind::InvalidUnit => "invalid_unit",
        }
    }

    /// Errors produced by the remote existence check rather than a local rule.
    pub fn is_async(&self) -> bool {
        matches!(
            self,
            ValidationErrorKind::CityNotFound | ValidationErrorKind::CityCountryMismatch
        )
    }
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ValidationErrorKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Where an error is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldPath {
    Date,
    Locations,
    LocationCity(usize),
    LocationCountry(usize),
    TemperatureUnit,
}

impl FieldPath {
    /// Form order: date, list, then each entry's city and country, then unit.
    pub fn sort_key(&self) -> (u8, usize, u8) {
        match self {
            FieldPath::Date => (0, 0, 0),
            FieldPath::Locations => (1, 0, 0),
            FieldPath::LocationCity(i) => (2, *i, 0),
            FieldPath::LocationCountry(i) => (2, *i, 1),
            FieldPath::TemperatureUnit => (3, 0, 0),
        }
    }

    pub fn entry_index(&self) -> Option<usize> {
        match self {
            FieldPath::LocationCity(i) | FieldPath::LocationCountry(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Date => f.write_str("date"),
            FieldPath::Locations => f.write_str("locations"),
            FieldPath::LocationCity(i) => write!(f, "locations[{i}].city"),
            FieldPath::LocationCountry(i) => write!(f, "locations[{i}].country"),
            FieldPath::TemperatureUnit => f.write_str("temperatureUnit"),
        }
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    path: FieldPath,
    kind: ValidationErrorKind,
    message: String,
}

impl FieldError {
    pub fn new(path: FieldPath, kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
        }
    }

    pub fn path(&self) -> FieldPath {
        self.path
    }

    pub fn kind(&self) -> ValidationErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.path, self.message, self.kind)
    }
}

/// Outcome of the remote existence check for one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryValidationStatus {
    /// Fields too short to look up.
    #[default]
    Idle,
    Pending,
    Valid,
    Invalid(ValidationErrorKind),
}

impl EntryValidationStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, EntryValidationStatus::Pending)
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, EntryValidationStatus::Valid)
    }

    /// The error to surface on the entry, present only once settled invalid.
    pub fn error(&self) -> Option<ValidationErrorKind> {
        match self {
            EntryValidationStatus::Invalid(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EntryValidationStatus::Idle => "idle",
            EntryValidationStatus::Pending => "pending",
            EntryValidationStatus::Valid => "valid",
            EntryValidationStatus::Invalid(_) => "invalid",
        }
    }
}

impl fmt::Display for EntryValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryValidationStatus::Invalid(kind) => write!(f, "invalid({kind})"),
            other => f.write_str(other.label()),
        }
    }
}

impl Serialize for EntryValidationStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Snapshot of every error plus per-entry check status.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    errors: Vec<FieldError>,
    statuses: Vec<EntryValidationStatus>,
    valid: bool,
}

impl ValidationReport {
    /// Validity requires no errors and every entry settled valid.
    pub fn new(errors: Vec<FieldError>, statuses: Vec<EntryValidationStatus>) -> Self {
        let valid = errors.is_empty() && statuses.iter().all(EntryValidationStatus::is_valid);
        Self {
            errors,
            statuses,
            valid,
        }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn statuses(&self) -> &[EntryValidationStatus] {
        &self.statuses
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn has_pending(&self) -> bool {
        self.statuses.iter().any(EntryValidationStatus::is_pending)
    }

    pub fn errors_at(&self, path: FieldPath) -> impl Iterator<Item = &FieldError> {
        self.errors.iter().filter(move |e| e.path == path)
    }

    pub fn count_of(&self, kind: ValidationErrorKind) -> usize {
        self.errors.iter().filter(|e| e.kind == kind).count()
    }

    pub fn has_kind(&self, kind: ValidationErrorKind) -> bool {
        self.count_of(kind) > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_path_display() {
        assert_eq!(FieldPath::LocationCity(2).to_string(), "locations[2].city");
        assert_eq!(FieldPath::TemperatureUnit.to_string(), "temperatureUnit");
    }

    #[test]
    fn test_report_validity_requires_settled_entries() {
        let pending = ValidationReport::new(vec![], vec![EntryValidationStatus::Pending]);
        assert!(!pending.is_valid());
        assert!(pending.has_pending());

        let settled = ValidationReport::new(vec![], vec![EntryValidationStatus::Valid]);
        assert!(settled.is_valid());
    }

    #[test]
    fn test_only_invalid_status_surfaces_an_error() {
        assert_eq!(EntryValidationStatus::Pending.error(), None);
        assert_eq!(EntryValidationStatus::Idle.error(), None);
        assert_eq!(
            EntryValidationStatus::Invalid(ValidationErrorKind::CityNotFound).error(),
            Some(ValidationErrorKind::CityNotFound)
        );
    }

    #[test]
    fn test_report_serializes_kinds_as_snake_case() {
        let report = ValidationReport::new(
            vec![FieldError::new(
                FieldPath::Locations,
                ValidationErrorKind::EmptyArray,
                "At least one location is required",
            )],
            vec![],
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["errors"][0]["kind"], "empty_array");
        assert_eq!(json["errors"][0]["path"], "locations");
        assert_eq!(json["valid"], false);
    }
}
