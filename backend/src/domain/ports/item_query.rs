//! Driving port for item reads.

use async_trait::async_trait;

use crate::domain::{Actor, Error, Item, ItemCategory, ItemId, UserId};

/// Request to list items visible to the requester.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListItemsRequest {
    /// `None` for anonymous requests.
    pub actor: Option<Actor>,
    pub category: Option<ItemCategory>,
    pub owner: Option<UserId>,
}

/// Driving port for item reads. Anonymous requests are allowed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemQuery: Send + Sync {
    /// Items visible to the requester, newest first.
    async fn list(&self, request: ListItemsRequest) -> Result<Vec<Item>, Error>;

    /// One item, or `NotFound` when it is absent or hidden from the requester.
    async fn get(&self, actor: Option<Actor>, item_id: ItemId) -> Result<Item, Error>;
}
