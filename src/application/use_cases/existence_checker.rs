use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, warn};

use crate::application::{CachedResult, LocationLookup, ResultCache};
use crate::domain::{LocationMatch, ValidationKey};

pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(2000);
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Why a check produced no match list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckFailure {
    /// City or country too short; no lookup was attempted.
    Incomplete,
    Transport(String),
    TimedOut,
}

/// Terminal result of one existence check.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    Matches(Vec<LocationMatch>),
    Failed(CheckFailure),
}

type SharedCheck = Shared<BoxFuture<'static, CheckOutcome>>;
type InFlight = Arc<Mutex<HashMap<ValidationKey, SharedCheck>>>;

/// Looks up whether a (city, country) pair exists, through the result cache.
///
/// A cache miss waits the settle delay before calling the remote lookup.
/// Requests for a key that is already being looked up join that lookup
/// instead of issuing their own, so each key reaches the network at most
/// once per successful resolution. The lookup itself runs on its own task:
/// a caller that stops waiting does not stop the cache from being filled.
/// Failures are never cached.
pub struct ExistenceChecker {
    lookup: Arc<dyn LocationLookup>,
    cache: Arc<dyn ResultCache>,
    settle_delay: Duration,
    lookup_timeout: Duration,
    in_flight: InFlight,
}

impl ExistenceChecker {
    pub fn new(lookup: Arc<dyn LocationLookup>, cache: Arc<dyn ResultCache>) -> Self {
        Self {
            lookup,
            cache,
            settle_delay: DEFAULT_SETTLE_DELAY,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    pub fn cache(&self) -> &Arc<dyn ResultCache> {
        &self.cache
    }

    /// Number of keys currently being looked up.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub async fn check(&self, city: &str, country: &str) -> CheckOutcome {
        let Some(key) = ValidationKey::complete(city, country) else {
            debug!("Skipping existence check for incomplete input {:?}, {:?}", city, country);
            return CheckOutcome::Failed(CheckFailure::Incomplete);
        };

        // The cache read, the join, and the registration happen under one
        // lock; a finishing lookup fills the cache before it deregisters.
        let pending = {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(cached) = self.cache.get(&key) {
                debug!("Cache hit for {}", key);
                return CheckOutcome::Matches(cached);
            }
            match in_flight.get(&key) {
                Some(existing) => {
                    debug!("Joining in-flight lookup for {}", key);
                    existing.clone()
                }
                None => {
                    let check = self.dispatch(key.clone(), city.trim(), country.trim());
                    in_flight.insert(key, check.clone());
                    check
                }
            }
        };

        pending.await
    }

    fn dispatch(&self, key: ValidationKey, city: &str, country: &str) -> SharedCheck {
        debug!(
            "Dispatching lookup for {} after {:?} settle delay",
            key, self.settle_delay
        );

        let lookup = Arc::clone(&self.lookup);
        let cache = Arc::clone(&self.cache);
        let in_flight = Arc::clone(&self.in_flight);
        let settle_delay = self.settle_delay;
        let lookup_timeout = self.lookup_timeout;
        let city = city.to_string();
        let country = country.to_string();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(settle_delay).await;

            let outcome =
                match tokio::time::timeout(lookup_timeout, lookup.search(&city, &country)).await {
                    Ok(Ok(matches)) => {
                        debug!("Lookup for {} returned {} candidates", key, matches.len());
                        cache.put(key.clone(), matches.clone());
                        CheckOutcome::Matches(matches)
                    }
                    Ok(Err(e)) => {
                        warn!("Lookup for {} failed: {}", key, e);
                        CheckOutcome::Failed(CheckFailure::Transport(e.to_string()))
                    }
                    Err(_) => {
                        warn!("Lookup for {} timed out after {:?}", key, lookup_timeout);
                        CheckOutcome::Failed(CheckFailure::TimedOut)
                    }
                };

            in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&key);
            outcome
        });

        async move {
            handle.await.unwrap_or_else(|e| {
                warn!("Lookup task ended abnormally: {}", e);
                CheckOutcome::Failed(CheckFailure::Transport(e.to_string()))
            })
        }
        .boxed()
        .shared()
    }
}

impl CheckOutcome {
    pub fn matches(&self) -> Option<&CachedResult> {
        match self {
            CheckOutcome::Matches(matches) => Some(matches),
            CheckOutcome::Failed(_) => None,
        }
    }
}
