use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::application::{CachedResult, ResultCache};
use crate::domain::ValidationKey;

/// Process-lifetime lookup cache. First writer wins.
pub struct InMemoryResultCache {
    entries: RwLock<HashMap<ValidationKey, CachedResult>>,
}

impl InMemoryResultCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryResultCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultCache for InMemoryResultCache {
    fn get(&self, key: &ValidationKey) -> Option<CachedResult> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn put(&self, key: ValidationKey, result: CachedResult) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.contains_key(&key) {
            debug!("Keeping existing cache entry for {}", key);
            return;
        }
        debug!("Caching {} candidates for {}", result.len(), key);
        entries.insert(key, result);
    }

    fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LocationMatch;

    #[test]
    fn test_put_then_get() {
        let cache = InMemoryResultCache::new();
        let key = ValidationKey::normalize("Paris", "France");
        assert!(cache.get(&key).is_none());

        cache.put(key.clone(), vec![LocationMatch::new("Paris", "France")]);
        assert_eq!(cache.get(&key).unwrap().len(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_first_writer_wins() {
        let cache = InMemoryResultCache::new();
        let key = ValidationKey::normalize("Paris", "France");
        cache.put(key.clone(), vec![LocationMatch::new("Paris", "France")]);
        cache.put(key.clone(), vec![]);
        assert_eq!(cache.get(&key).unwrap(), vec![LocationMatch::new("Paris", "France")]);
    }

    #[test]
    fn test_empty_payload_is_cached() {
        let cache = InMemoryResultCache::new();
        let key = ValidationKey::normalize("Atlantis", "Greece");
        cache.put(key.clone(), vec![]);
        assert_eq!(cache.get(&key), Some(vec![]));
    }
}
