use async_trait::async_trait;

use crate::domain::{DomainError, LocationMatch};

/// The remote "does this place exist" search.
///
/// Implementors return every candidate record the provider knows for the
/// query, or an empty list. Transport and provider failures are errors.
#[async_trait]
pub trait LocationLookup: Send + Sync {
    async fn search(&self, city: &str, country: &str) -> Result<Vec<LocationMatch>, DomainError>;
}
