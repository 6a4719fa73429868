//! Port turning stored media references into client-facing URLs.

use crate::domain::MediaReference;

/// Resolve an item's image reference to a retrievable URL.
#[cfg_attr(test, mockall::automock)]
pub trait MediaResolver: Send + Sync {
    /// Public URL for `reference`.
    fn resolve(&self, reference: &MediaReference) -> String;
}
