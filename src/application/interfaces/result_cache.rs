use crate::domain::{LocationMatch, ValidationKey};

/// Raw payload of a successful lookup; an empty list means "no such place".
pub type CachedResult = Vec<LocationMatch>;

/// Process-lifetime store of lookup payloads.
///
/// Entries are never evicted or replaced: `put` on a key that is already
/// present keeps the first payload.
pub trait ResultCache: Send + Sync {
    fn get(&self, key: &ValidationKey) -> Option<CachedResult>;

    fn put(&self, key: ValidationKey, result: CachedResult);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
