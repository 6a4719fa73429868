//! Item listing services.
//!
//! Implements [`ItemCommand`] and [`ItemQuery`]. Mutations load the stored
//! item, consult the [`AccessPolicy`], then write back with a revision guard
//! so a concurrent change surfaces as `Conflict` instead of a lost update.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    ChangeItemStatusRequest, CreateItemRequest, ItemCommand, ItemListFilter, ItemQuery,
    ItemRepository, ItemRepositoryError, ListItemsRequest, UpdateItemRequest,
};
use crate::domain::{
    AccessPolicy, Actor, Error, Item, ItemId, ItemStatus, Operation, ParseItemStatusError,
};

/// Item service implementing the item driving ports.
#[derive(Clone)]
pub struct ItemService<I> {
    items: Arc<I>,
    clock: Arc<dyn Clock>,
    policy: AccessPolicy,
}

impl<I> ItemService<I> {
    /// Create a new service over an item repository.
    pub fn new(items: Arc<I>, clock: Arc<dyn Clock>) -> Self {
        Self {
            items,
            clock,
            policy: AccessPolicy,
        }
    }
}

pub(crate) fn map_item_error(error: ItemRepositoryError) -> Error {
    match error {
        ItemRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("item repository unavailable: {message}"))
        }
        ItemRepositoryError::Query { message } => {
            Error::internal(format!("item repository error: {message}"))
        }
        ItemRepositoryError::RevisionMismatch { expected, actual } => {
            Error::conflict("item was modified concurrently").with_details(json!({
                "expectedRevision": expected,
                "actualRevision": actual,
                "code": "revision_mismatch",
            }))
        }
        ItemRepositoryError::Missing { id } => Error::not_found(format!("item {id} not found")),
    }
}

pub(crate) fn item_not_found(id: &ItemId) -> Error {
    Error::not_found(format!("item {id} not found"))
}

fn parse_status(raw: &str) -> Result<ItemStatus, Error> {
    raw.parse().map_err(|err: ParseItemStatusError| {
        Error::invalid_status(err.to_string()).with_details(json!({
            "field": "status",
            "value": raw,
            "code": "invalid_value",
        }))
    })
}

impl<I> ItemService<I>
where
    I: ItemRepository,
{
    async fn load(&self, id: &ItemId) -> Result<Item, Error> {
        self.items
            .find_by_id(id)
            .await
            .map_err(map_item_error)?
            .ok_or_else(|| item_not_found(id))
    }

    async fn load_for_mutation(&self, actor: &Actor, id: &ItemId) -> Result<Item, Error> {
        let item = self.load(id).await?;
        self.policy.authorize_item(actor, &item, Operation::Mutate)?;
        Ok(item)
    }

    async fn write(&self, updated: Item, expected_revision: u32) -> Result<Item, Error> {
        self.items
            .update(&updated, expected_revision)
            .await
            .map_err(map_item_error)?;
        Ok(updated)
    }
}

#[async_trait]
impl<I> ItemCommand for ItemService<I>
where
    I: ItemRepository,
{
    async fn create(&self, request: CreateItemRequest) -> Result<Item, Error> {
        let CreateItemRequest { actor, details } = request;
        let item = Item::new(ItemId::random(), actor.id().clone(), details, self.clock.utc());
        self.items.insert(&item).await.map_err(map_item_error)?;

        info!(item_id = %item.id, owner = %item.owner, "item listed");
        Ok(item)
    }

    async fn update(&self, request: UpdateItemRequest) -> Result<Item, Error> {
        let UpdateItemRequest {
            actor,
            item_id,
            details,
        } = request;
        let item = self.load_for_mutation(&actor, &item_id).await?;
        let updated = item.with_details(details, self.clock.utc());
        let updated = self.write(updated, item.revision).await?;

        info!(item_id = %item_id, actor = %actor.id(), "item details updated");
        Ok(updated)
    }

    async fn change_status(&self, request: ChangeItemStatusRequest) -> Result<Item, Error> {
        let ChangeItemStatusRequest {
            actor,
            item_id,
            status,
        } = request;
        let item = self.load_for_mutation(&actor, &item_id).await?;
        let status = parse_status(&status)?;
        if item.status.is_traded() {
            return Err(Error::conflict("traded items cannot change status"));
        }
        let updated = item.with_status(status, self.clock.utc());
        let updated = self.write(updated, item.revision).await?;

        info!(
            item_id = %item_id,
            actor = %actor.id(),
            from = %item.status,
            to = %status,
            "item status changed"
        );
        Ok(updated)
    }

    async fn delete(&self, actor: Actor, item_id: ItemId) -> Result<(), Error> {
        self.load_for_mutation(&actor, &item_id).await?;
        if !self.items.delete(&item_id).await.map_err(map_item_error)? {
            return Err(item_not_found(&item_id));
        }

        info!(item_id = %item_id, actor = %actor.id(), "item deleted");
        Ok(())
    }
}

#[async_trait]
impl<I> ItemQuery for ItemService<I>
where
    I: ItemRepository,
{
    async fn list(&self, request: ListItemsRequest) -> Result<Vec<Item>, Error> {
        let filter = ItemListFilter {
            visibility: self.policy.item_visibility(request.actor.as_ref()),
            category: request.category,
            owner: request.owner,
        };
        self.items.list(&filter).await.map_err(map_item_error)
    }

    async fn get(&self, actor: Option<Actor>, item_id: ItemId) -> Result<Item, Error> {
        let item = self.load(&item_id).await?;
        if self.policy.item_visible(actor.as_ref(), &item) {
            Ok(item)
        } else {
            Err(item_not_found(&item_id))
        }
    }
}

#[cfg(test)]
#[path = "item_service_tests.rs"]
mod tests;
