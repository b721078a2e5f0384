use tracing::debug;

use super::existence_checker::CheckOutcome;
use crate::domain::{EntryValidationStatus, ValidationErrorKind, ValidationKey};

/// Stable identity of a session; list indices shift, session ids do not.
pub type SessionId = u64;

/// A request to run one existence check on behalf of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckTicket {
    pub session: SessionId,
    pub generation: u64,
    pub key: ValidationKey,
    pub city: String,
    pub country: String,
}

/// The result of a ticket, routed back to its session.
#[derive(Debug, Clone)]
pub struct CheckCompletion {
    pub session: SessionId,
    pub generation: u64,
    pub outcome: CheckOutcome,
}

/// Async-validation lifecycle of a single location entry.
///
/// Every dispatch bumps the generation; a completion is applied only when it
/// carries the current generation, so a superseded check can never write the
/// status no matter when it resolves.
#[derive(Debug, Clone)]
pub struct EntryValidationSession {
    id: SessionId,
    generation: u64,
    key: Option<ValidationKey>,
    status: EntryValidationStatus,
    city_touched: bool,
    country_touched: bool,
}

impl EntryValidationSession {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            generation: 0,
            key: None,
            status: EntryValidationStatus::Idle,
            city_touched: false,
            country_touched: false,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn key(&self) -> Option<&ValidationKey> {
        self.key.as_ref()
    }

    pub fn status(&self) -> EntryValidationStatus {
        self.status
    }

    pub fn async_error(&self) -> Option<ValidationErrorKind> {
        self.status.error()
    }

    /// React to the entry's current city and country.
    ///
    /// Returns a ticket when a new check must be dispatched.
    pub fn on_input(&mut self, city: &str, country: &str) -> Option<CheckTicket> {
        let Some(candidate) = ValidationKey::complete(city, country) else {
            if self.key.is_some() || self.status != EntryValidationStatus::Idle {
                debug!("Session {} input incomplete, back to idle", self.id);
            }
            self.supersede();
            self.key = None;
            self.status = EntryValidationStatus::Idle;
            return None;
        };

        if self.key.as_ref() == Some(&candidate) {
            return None;
        }

        self.supersede();
        self.key = Some(candidate.clone());
        self.status = EntryValidationStatus::Pending;
        debug!(
            "Session {} dispatching generation {} for {}",
            self.id, self.generation, candidate
        );

        Some(CheckTicket {
            session: self.id,
            generation: self.generation,
            key: candidate,
            city: city.trim().to_string(),
            country: country.trim().to_string(),
        })
    }

    /// Apply a completion. Returns `false` when it was stale and ignored.
    pub fn apply(&mut self, completion: &CheckCompletion) -> bool {
        if completion.session != self.id
            || completion.generation != self.generation
            || !self.status.is_pending()
        {
            debug!(
                "Session {} discarding stale result (generation {}, current {})",
                self.id, completion.generation, self.generation
            );
            return false;
        }
        let Some(key) = self.key.as_ref() else {
            return false;
        };

        self.status = settle(key, &completion.outcome);
        debug!("Session {} settled {} for {}", self.id, self.status, key);
        true
    }

    pub fn touch_city(&mut self) {
        self.city_touched = true;
    }

    pub fn touch_country(&mut self) {
        self.country_touched = true;
    }

    pub fn city_touched(&self) -> bool {
        self.city_touched
    }

    pub fn country_touched(&self) -> bool {
        self.country_touched
    }

    fn supersede(&mut self) {
        self.generation += 1;
    }
}

fn settle(key: &ValidationKey, outcome: &CheckOutcome) -> EntryValidationStatus {
    match outcome {
        CheckOutcome::Failed(_) => EntryValidationStatus::Invalid(ValidationErrorKind::CityNotFound),
        CheckOutcome::Matches(matches) if matches.is_empty() => {
            EntryValidationStatus::Invalid(ValidationErrorKind::CityNotFound)
        }
        CheckOutcome::Matches(matches) if matches.iter().any(|m| key.matches(m)) => {
            EntryValidationStatus::Valid
        }
        CheckOutcome::Matches(_) => {
            EntryValidationStatus::Invalid(ValidationErrorKind::CityCountryMismatch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::CheckFailure;
    use crate::domain::LocationMatch;

    fn complete(ticket: &CheckTicket, outcome: CheckOutcome) -> CheckCompletion {
        CheckCompletion {
            session: ticket.session,
            generation: ticket.generation,
            outcome,
        }
    }

    #[test]
    fn test_incomplete_input_stays_idle() {
        let mut session = EntryValidationSession::new(1);
        assert!(session.on_input("P", "France").is_none());
        assert_eq!(session.status(), EntryValidationStatus::Idle);
    }

    #[test]
    fn test_same_key_is_a_no_op() {
        let mut session = EntryValidationSession::new(1);
        let ticket = session.on_input("Paris", "France").unwrap();
        assert!(session.on_input("paris ", "FRANCE").is_none());
        assert_eq!(session.generation(), ticket.generation);
        assert!(session.status().is_pending());
    }

    #[test]
    fn test_superseded_ticket_is_discarded() {
        let mut session = EntryValidationSession::new(1);
        let first = session.on_input("Paris", "France").unwrap();
        let second = session.on_input("Lyon", "France").unwrap();
        assert!(second.generation > first.generation);

        let stale = complete(&first, CheckOutcome::Matches(vec![]));
        assert!(!session.apply(&stale));
        assert!(session.status().is_pending());

        let fresh = complete(
            &second,
            CheckOutcome::Matches(vec![LocationMatch::new("Lyon", "France")]),
        );
        assert!(session.apply(&fresh));
        assert_eq!(session.status(), EntryValidationStatus::Valid);

        // A late duplicate of the stale result changes nothing either.
        assert!(!session.apply(&stale));
        assert_eq!(session.status(), EntryValidationStatus::Valid);
    }

    #[test]
    fn test_result_after_going_idle_is_discarded() {
        let mut session = EntryValidationSession::new(1);
        let ticket = session.on_input("Paris", "France").unwrap();
        assert!(session.on_input("P", "France").is_none());
        assert!(!session.apply(&complete(&ticket, CheckOutcome::Matches(vec![]))));
        assert_eq!(session.status(), EntryValidationStatus::Idle);
        assert_eq!(session.async_error(), None);
    }

    #[test]
    fn test_outcome_mapping() {
        let key = ValidationKey::normalize("Paris", "France");
        assert_eq!(
            settle(&key, &CheckOutcome::Failed(CheckFailure::TimedOut)),
            EntryValidationStatus::Invalid(ValidationErrorKind::CityNotFound)
        );
        assert_eq!(
            settle(&key, &CheckOutcome::Matches(vec![])),
            EntryValidationStatus::Invalid(ValidationErrorKind::CityNotFound)
        );
        assert_eq!(
            settle(
                &key,
                &CheckOutcome::Matches(vec![LocationMatch::new("Paris", "United States of America")])
            ),
            EntryValidationStatus::Invalid(ValidationErrorKind::CityCountryMismatch)
        );
        assert_eq!(
            settle(
                &key,
                &CheckOutcome::Matches(vec![
                    LocationMatch::new("Paris", "United States of America"),
                    LocationMatch::new("Paris", "France"),
                ])
            ),
            EntryValidationStatus::Valid
        );
    }

    #[test]
    fn test_completion_for_another_session_is_ignored() {
        let mut a = EntryValidationSession::new(1);
        let mut b = EntryValidationSession::new(2);
        let ticket_a = a.on_input("Paris", "France").unwrap();
        b.on_input("Paris", "France").unwrap();
        assert!(!b.apply(&complete(&ticket_a, CheckOutcome::Matches(vec![]))));
    }
}
