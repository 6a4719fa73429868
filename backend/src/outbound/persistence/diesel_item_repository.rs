//! PostgreSQL-backed `ItemRepository` implementation using Diesel ORM.
//!
//! Updates filter on the stored revision; when no row matches, a follow-up
//! read distinguishes a stale revision from a deleted item.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{ItemListFilter, ItemRepository, ItemRepositoryError};
use crate::domain::{Item, ItemId, ItemStatus, ItemVisibility};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, map_decode_error,
};
use super::models::{ItemRow, ItemUpdate, revision_from_db, revision_to_db};
use super::pool::{DbPool, PoolError};
use super::schema::items;

/// Diesel-backed implementation of the [`ItemRepository`] port.
#[derive(Clone)]
pub struct DieselItemRepository {
    pool: DbPool,
}

impl DieselItemRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ItemRepositoryError {
    map_basic_pool_error(error, ItemRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ItemRepositoryError {
    map_basic_diesel_error(
        error,
        ItemRepositoryError::query,
        ItemRepositoryError::connection,
    )
}

fn decode(row: ItemRow) -> Result<Item, ItemRepositoryError> {
    row.into_item()
        .map_err(|err| map_decode_error(err, ItemRepositoryError::query))
}

/// Explain why a guarded update touched no rows.
async fn handle_item_update_failure<C>(
    conn: &mut C,
    item_id: Uuid,
    expected_revision: u32,
) -> ItemRepositoryError
where
    C: diesel_async::AsyncConnection<Backend = diesel::pg::Pg> + Send,
{
    let current = items::table
        .filter(items::id.eq(item_id))
        .select(items::revision)
        .first::<i32>(conn)
        .await
        .optional()
        .map_err(map_diesel_error);

    match current {
        Ok(Some(actual)) => {
            ItemRepositoryError::revision_mismatch(expected_revision, revision_from_db(actual))
        }
        Ok(None) => ItemRepositoryError::missing(item_id.to_string()),
        Err(err) => err,
    }
}

#[async_trait]
impl ItemRepository for DieselItemRepository {
    async fn insert(&self, item: &Item) -> Result<(), ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(items::table)
            .values(&ItemRow::from_item(item))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &ItemId) -> Result<Option<Item>, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = items::table
            .filter(items::id.eq(id.as_uuid()))
            .select(ItemRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(decode).transpose()
    }

    async fn list(&self, filter: &ItemListFilter) -> Result<Vec<Item>, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = items::table.select(ItemRow::as_select()).into_boxed();
        if filter.visibility == ItemVisibility::AvailableOnly {
            query = query.filter(items::status.eq(ItemStatus::Available.as_str()));
        }
        if let Some(category) = filter.category {
            query = query.filter(items::category.eq(category.as_str()));
        }
        if let Some(owner) = &filter.owner {
            query = query.filter(items::owner_id.eq(*owner.as_uuid()));
        }

        let rows: Vec<ItemRow> = query
            .order((items::created_at.desc(), items::id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(decode).collect()
    }

    async fn update(&self, item: &Item, expected_revision: u32) -> Result<(), ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated_rows = diesel::update(items::table)
            .filter(
                items::id
                    .eq(item.id.as_uuid())
                    .and(items::revision.eq(revision_to_db(expected_revision))),
            )
            .set(&ItemUpdate::from_item(item))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if updated_rows == 0 {
            return Err(
                handle_item_update_failure(&mut conn, *item.id.as_uuid(), expected_revision).await,
            );
        }
        Ok(())
    }

    async fn delete(&self, id: &ItemId) -> Result<bool, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(items::table.filter(items::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("connection refused"));
        assert_eq!(repo_err, ItemRepositoryError::connection("connection refused"));
    }

    #[rstest]
    fn diesel_error_maps_to_query_error() {
        let repo_err = map_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(repo_err, ItemRepositoryError::Query { .. }));
    }
}
