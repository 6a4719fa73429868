//! PostgreSQL-backed `OfferRepository` implementation using Diesel ORM.
//!
//! Settlement writes the offer and its traded items inside one transaction.
//! Each statement filters on the revision the service read; if any of them
//! touches no row the transaction rolls back and the caller sees `Conflict`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{OfferRepository, OfferRepositoryError, OfferSettlement};
use crate::domain::{Offer, OfferId, OfferScope};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, map_decode_error,
};
use super::models::{ItemUpdate, OfferRow, OfferUpdate, revision_to_db};
use super::pool::{DbPool, PoolError};
use super::schema::{items, offers};

/// Diesel-backed implementation of the [`OfferRepository`] port.
#[derive(Clone)]
pub struct DieselOfferRepository {
    pool: DbPool,
}

impl DieselOfferRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> OfferRepositoryError {
    map_basic_pool_error(error, OfferRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> OfferRepositoryError {
    map_basic_diesel_error(
        error,
        OfferRepositoryError::query,
        OfferRepositoryError::connection,
    )
}

fn decode(row: OfferRow) -> Result<Offer, OfferRepositoryError> {
    row.into_offer()
        .map_err(|err| map_decode_error(err, OfferRepositoryError::query))
}

/// Transaction outcome that aborts the settlement.
#[derive(Debug)]
enum SettleAbort {
    Diesel(diesel::result::Error),
    Stale(String),
}

impl From<diesel::result::Error> for SettleAbort {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

impl From<SettleAbort> for OfferRepositoryError {
    fn from(abort: SettleAbort) -> Self {
        match abort {
            SettleAbort::Diesel(error) => map_diesel_error(error),
            SettleAbort::Stale(message) => Self::conflict(message),
        }
    }
}

#[async_trait]
impl OfferRepository for DieselOfferRepository {
    async fn insert(&self, offer: &Offer) -> Result<(), OfferRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(offers::table)
            .values(&OfferRow::from_offer(offer))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &OfferId) -> Result<Option<Offer>, OfferRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = offers::table
            .filter(offers::id.eq(id.as_uuid()))
            .select(OfferRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(decode).transpose()
    }

    async fn list(&self, scope: &OfferScope) -> Result<Vec<Offer>, OfferRepositoryError> {
        let mut query = offers::table.select(OfferRow::as_select()).into_boxed();
        match scope {
            OfferScope::All => {}
            OfferScope::Participant(user) => {
                let user: Uuid = *user.as_uuid();
                let owned_items = items::table
                    .filter(items::owner_id.eq(user))
                    .select(items::id);
                query = query.filter(
                    offers::offerer_id
                        .eq(user)
                        .or(offers::item_desired_id.eq_any(owned_items)),
                );
            }
            OfferScope::Nothing => return Ok(Vec::new()),
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<OfferRow> = query
            .order((offers::created_at.desc(), offers::id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(decode).collect()
    }

    async fn update(
        &self,
        offer: &Offer,
        expected_revision: u32,
    ) -> Result<(), OfferRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated_rows = diesel::update(offers::table)
            .filter(
                offers::id
                    .eq(offer.id.as_uuid())
                    .and(offers::revision.eq(revision_to_db(expected_revision))),
            )
            .set(&OfferUpdate::from_offer(offer))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if updated_rows == 0 {
            return Err(OfferRepositoryError::conflict(format!(
                "offer {} changed since revision {expected_revision}",
                offer.id
            )));
        }
        Ok(())
    }

    async fn delete(&self, id: &OfferId) -> Result<bool, OfferRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(offers::table.filter(offers::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn settle(&self, settlement: &OfferSettlement) -> Result<(), OfferRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, SettleAbort, _>(|conn| {
            async move {
                let offer = &settlement.offer;
                let touched = diesel::update(offers::table)
                    .filter(offers::id.eq(offer.id.as_uuid()).and(
                        offers::revision.eq(revision_to_db(settlement.expected_offer_revision)),
                    ))
                    .set(&OfferUpdate::from_offer(offer))
                    .execute(conn)
                    .await?;
                if touched == 0 {
                    return Err(SettleAbort::Stale(format!(
                        "offer {} was modified concurrently",
                        offer.id
                    )));
                }

                for transition in &settlement.items {
                    let item = &transition.item;
                    let touched = diesel::update(items::table)
                        .filter(items::id.eq(item.id.as_uuid()).and(
                            items::revision.eq(revision_to_db(transition.expected_revision)),
                        ))
                        .set(&ItemUpdate::from_item(item))
                        .execute(conn)
                        .await?;
                    if touched == 0 {
                        return Err(SettleAbort::Stale(format!(
                            "item {} was modified concurrently",
                            item.id
                        )));
                    }
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(OfferRepositoryError::from)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn stale_settlements_become_conflicts() {
        let err = OfferRepositoryError::from(SettleAbort::Stale("item changed".to_owned()));
        assert_eq!(err, OfferRepositoryError::conflict("item changed"));
    }

    #[rstest]
    fn diesel_failures_inside_settlement_become_query_errors() {
        let err = OfferRepositoryError::from(SettleAbort::Diesel(diesel::result::Error::NotFound));
        assert!(matches!(err, OfferRepositoryError::Query { .. }));
    }
}
