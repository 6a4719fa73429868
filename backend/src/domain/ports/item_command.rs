//! Driving port for item mutations.

use async_trait::async_trait;

use crate::domain::{Actor, Error, Item, ItemDetails, ItemId};

/// Request to list a new item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateItemRequest {
    pub actor: Actor,
    pub details: ItemDetails,
}

/// Request to replace an item's editable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateItemRequest {
    pub actor: Actor,
    pub item_id: ItemId,
    pub details: ItemDetails,
}

/// Request to move an item to a new status.
///
/// `status` is the caller's raw value; it is only parsed once the actor is
/// known to be allowed to touch the item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeItemStatusRequest {
    pub actor: Actor,
    pub item_id: ItemId,
    pub status: String,
}

/// Driving port for item mutations.
///
/// Every operation requires an authenticated actor; ownership is checked
/// through the access policy.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemCommand: Send + Sync {
    /// List a new `available` item owned by the actor.
    async fn create(&self, request: CreateItemRequest) -> Result<Item, Error>;

    /// Replace title, description, category, location, address and image.
    async fn update(&self, request: UpdateItemRequest) -> Result<Item, Error>;

    /// Change the item's lifecycle status.
    async fn change_status(&self, request: ChangeItemStatusRequest) -> Result<Item, Error>;

    /// Delete the item and every offer referencing it.
    async fn delete(&self, actor: Actor, item_id: ItemId) -> Result<(), Error>;
}
