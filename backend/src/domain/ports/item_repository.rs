//! Port for item persistence.
//!
//! Updates are guarded by the item's `revision`: the adapter only writes when
//! the stored revision equals the one the caller read.

use async_trait::async_trait;

use crate::domain::{Item, ItemCategory, ItemId, ItemVisibility, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by item repository adapters.
    pub enum ItemRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "item repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "item repository query failed: {message}",
        /// Optimistic concurrency check failed.
        RevisionMismatch { expected: u32, actual: u32 } =>
            "revision mismatch: expected {expected}, found {actual}",
        /// The item vanished between read and write.
        Missing { id: String } => "item {id} no longer exists",
    }
}

/// Equality filters applied to item listings after visibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemListFilter {
    pub visibility: ItemVisibility,
    pub category: Option<ItemCategory>,
    pub owner: Option<UserId>,
}

impl ItemListFilter {
    /// Filter admitting every item the visibility allows.
    pub const fn visible(visibility: ItemVisibility) -> Self {
        Self {
            visibility,
            category: None,
            owner: None,
        }
    }

    /// Whether `item` passes every filter.
    pub fn matches(&self, item: &Item) -> bool {
        self.visibility.admits(item.status)
            && self.category.is_none_or(|category| item.details.category == category)
            && self.owner.as_ref().is_none_or(|owner| item.is_owned_by(owner))
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Persist a newly listed item.
    async fn insert(&self, item: &Item) -> Result<(), ItemRepositoryError>;

    /// Fetch an item by identifier.
    async fn find_by_id(&self, id: &ItemId) -> Result<Option<Item>, ItemRepositoryError>;

    /// List items matching `filter`, newest first.
    async fn list(&self, filter: &ItemListFilter) -> Result<Vec<Item>, ItemRepositoryError>;

    /// Overwrite an item when its stored revision equals `expected_revision`.
    ///
    /// The caller sets `item.revision` to the new value before calling.
    async fn update(&self, item: &Item, expected_revision: u32)
    -> Result<(), ItemRepositoryError>;

    /// Delete an item and, through cascade, every offer referencing it.
    ///
    /// Returns `false` when no item had that identifier.
    async fn delete(&self, id: &ItemId) -> Result<bool, ItemRepositoryError>;
}
