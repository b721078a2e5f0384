use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::entry_session::{CheckCompletion, CheckTicket, EntryValidationSession, SessionId};
use super::existence_checker::ExistenceChecker;
use crate::domain::{
    DomainError, EntryValidationStatus, FieldError, FieldPath, FormRules, FormState,
    TemperatureUnit, ValidationErrorKind, ValidationReport,
};

/// Owns the form and one validation session per location entry.
///
/// Synchronous rules are recomputed from the current state on every read,
/// so list-shape changes (add, remove) are reflected immediately. Existence
/// checks run on spawned tasks and report back over a channel; completions
/// are applied by [`poll_completions`](Self::poll_completions),
/// [`next_completion`](Self::next_completion) or [`settle`](Self::settle).
pub struct ListValidationCoordinator {
    state: FormState,
    sessions: Vec<EntryValidationSession>,
    checker: Arc<ExistenceChecker>,
    rules: FormRules,
    today: NaiveDate,
    next_session: SessionId,
    date_touched: bool,
    unit_touched: bool,
    locations_touched: bool,
    completions_tx: mpsc::UnboundedSender<CheckCompletion>,
    completions_rx: mpsc::UnboundedReceiver<CheckCompletion>,
}

impl ListValidationCoordinator {
    pub fn new(checker: Arc<ExistenceChecker>) -> Self {
        Self::with_state(checker, FormState::default())
    }

    /// Start from an existing state; checks for its complete entries are
    /// dispatched right away.
    pub fn with_state(checker: Arc<ExistenceChecker>, state: FormState) -> Self {
        let FormState {
            date,
            locations,
            temperature_unit,
        } = state;
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let mut coordinator = Self {
            state: FormState {
                date,
                locations: Vec::new(),
                temperature_unit,
            },
            sessions: Vec::new(),
            checker,
            rules: FormRules::new(),
            today: Local::now().date_naive(),
            next_session: 1,
            date_touched: false,
            unit_touched: false,
            locations_touched: false,
            completions_tx,
            completions_rx,
        };
        for entry in locations {
            coordinator.add_entry();
            let index = coordinator.state.locations.len() - 1;
            coordinator.state.locations[index] = entry;
            coordinator.revalidate_entry(index);
        }
        coordinator
    }

    pub fn with_rules(mut self, rules: FormRules) -> Self {
        self.rules = rules;
        self
    }

    /// Reference day for the date window.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn len(&self) -> usize {
        self.state.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.locations.is_empty()
    }

    pub fn entry_status(&self, index: usize) -> Option<EntryValidationStatus> {
        self.sessions.get(index).map(EntryValidationSession::status)
    }

    pub fn has_pending(&self) -> bool {
        self.sessions.iter().any(|s| s.status().is_pending())
    }

    /// Append a blank entry.
    pub fn add_entry(&mut self) {
        self.state.add_location();
        let id = self.next_session;
        self.next_session += 1;
        self.sessions.push(EntryValidationSession::new(id));
        debug!("Added location entry {} (session {})", self.len() - 1, id);
    }

    /// Remove the entry at `index`; results still in flight for it are
    /// dropped on arrival.
    pub fn remove_entry(&mut self, index: usize) -> Result<(), DomainError> {
        self.state.remove_location(index)?;
        let session = self.sessions.remove(index);
        self.locations_touched = true;
        debug!("Removed location entry {} (session {})", index, session.id());
        Ok(())
    }

    pub fn set_city(&mut self, index: usize, city: impl Into<String>) -> Result<(), DomainError> {
        self.state.location_mut(index)?.city = city.into();
        self.revalidate_entry(index);
        Ok(())
    }

    pub fn set_country(
        &mut self,
        index: usize,
        country: impl Into<String>,
    ) -> Result<(), DomainError> {
        self.state.location_mut(index)?.country = country.into();
        self.revalidate_entry(index);
        Ok(())
    }

    pub fn set_location(
        &mut self,
        index: usize,
        city: impl Into<String>,
        country: impl Into<String>,
    ) -> Result<(), DomainError> {
        let entry = self.state.location_mut(index)?;
        entry.city = city.into();
        entry.country = country.into();
        self.revalidate_entry(index);
        Ok(())
    }

    pub fn set_date(&mut self, date: impl Into<String>) {
        self.state.date = date.into();
    }

    pub fn set_temperature_unit(&mut self, unit: impl Into<String>) {
        self.state.temperature_unit = unit.into();
    }

    pub fn set_unit(&mut self, unit: TemperatureUnit) {
        self.set_temperature_unit(unit.as_str());
    }

    /// Back to the default form; every session is discarded.
    pub fn clear(&mut self) {
        info!("Clearing form");
        self.sessions.clear();
        self.state = FormState {
            locations: Vec::new(),
            ..FormState::for_today(self.today)
        };
        self.date_touched = false;
        self.unit_touched = false;
        self.locations_touched = false;
        self.add_entry();
    }

    pub fn touch(&mut self, path: FieldPath) {
        match path {
            FieldPath::Date => self.date_touched = true,
            FieldPath::TemperatureUnit => self.unit_touched = true,
            FieldPath::Locations => self.locations_touched = true,
            FieldPath::LocationCity(i) => {
                if let Some(session) = self.sessions.get_mut(i) {
                    session.touch_city();
                }
            }
            FieldPath::LocationCountry(i) => {
                if let Some(session) = self.sessions.get_mut(i) {
                    session.touch_country();
                }
            }
        }
    }

    pub fn mark_all_touched(&mut self) {
        self.date_touched = true;
        self.unit_touched = true;
        self.locations_touched = true;
        for session in &mut self.sessions {
            session.touch_city();
            session.touch_country();
        }
    }

    pub fn is_touched(&self, path: FieldPath) -> bool {
        match path {
            FieldPath::Date => self.date_touched,
            FieldPath::TemperatureUnit => self.unit_touched,
            FieldPath::Locations => self.locations_touched,
            FieldPath::LocationCity(i) => self.sessions.get(i).is_some_and(|s| s.city_touched()),
            FieldPath::LocationCountry(i) => {
                self.sessions.get(i).is_some_and(|s| s.country_touched())
            }
        }
    }

    /// All current errors: synchronous rules, duplicates, cardinality, and
    /// settled existence-check failures on the city field.
    pub fn report(&self) -> ValidationReport {
        let mut errors = self.rules.validate(&self.state, self.today);
        for (index, session) in self.sessions.iter().enumerate() {
            if let Some(kind) = session.async_error() {
                errors.push(FieldError::new(
                    FieldPath::LocationCity(index),
                    kind,
                    async_message(kind),
                ));
            }
        }
        errors.sort_by_key(|e| e.path().sort_key());
        let statuses = self.sessions.iter().map(|s| s.status()).collect();
        ValidationReport::new(errors, statuses)
    }

    pub fn is_valid(&self) -> bool {
        self.report().is_valid()
    }

    /// Errors on fields the user has interacted with.
    pub fn visible_errors(&self) -> Vec<FieldError> {
        self.report()
            .errors()
            .iter()
            .filter(|e| self.is_touched(e.path()))
            .cloned()
            .collect()
    }

    /// Apply every completion that has already arrived. Returns how many
    /// changed an entry's status.
    pub fn poll_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completions_rx.try_recv() {
            if self.apply_completion(completion) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for the next completion and apply it. Returns whether it changed
    /// an entry's status. Cancel-safe.
    pub async fn next_completion(&mut self) -> bool {
        match self.completions_rx.recv().await {
            Some(completion) => self.apply_completion(completion),
            None => false,
        }
    }

    /// Wait until no entry is pending.
    pub async fn settle(&mut self) {
        self.poll_completions();
        while self.has_pending() {
            self.next_completion().await;
        }
    }

    fn revalidate_entry(&mut self, index: usize) {
        let (Some(entry), Some(session)) =
            (self.state.locations.get(index), self.sessions.get_mut(index))
        else {
            return;
        };
        if let Some(ticket) = session.on_input(&entry.city, &entry.country) {
            self.dispatch(ticket);
        }
    }

    fn dispatch(&self, ticket: CheckTicket) {
        let checker = Arc::clone(&self.checker);
        let tx = self.completions_tx.clone();
        tokio::spawn(async move {
            let outcome = checker.check(&ticket.city, &ticket.country).await;
            // The receiver only goes away with the coordinator.
            let _ = tx.send(CheckCompletion {
                session: ticket.session,
                generation: ticket.generation,
                outcome,
            });
        });
    }

    fn apply_completion(&mut self, completion: CheckCompletion) -> bool {
        match self.sessions.iter_mut().find(|s| s.id() == completion.session) {
            Some(session) => session.apply(&completion),
            None => {
                debug!(
                    "Discarding result for removed session {}",
                    completion.session
                );
                false
            }
        }
    }
}

fn async_message(kind: ValidationErrorKind) -> &'static str {
    match kind {
        ValidationErrorKind::CityCountryMismatch => "City does not match the selected country",
        _ => "City not found",
    }
}
