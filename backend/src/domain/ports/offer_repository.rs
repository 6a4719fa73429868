//! Port for offer persistence and atomic offer settlement.

use async_trait::async_trait;

use crate::domain::{Item, Offer, OfferId, OfferScope};

use super::define_port_error;

define_port_error! {
    /// Errors raised by offer repository adapters.
    pub enum OfferRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "offer repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "offer repository query failed: {message}",
        /// A guarded row changed since it was read. Nothing was written.
        Conflict { message: String } => "offer write conflict: {message}",
    }
}

/// Item write applied as part of an offer settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemTransition {
    /// The item with its new state and bumped revision.
    pub item: Item,
    /// Revision the caller read before deciding.
    pub expected_revision: u32,
}

/// All writes produced by accepting or refusing an offer.
///
/// Adapters apply the offer write and every item transition in one
/// transaction. If any stored revision differs from the expected one, no
/// write is kept and [`OfferRepositoryError::Conflict`] is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferSettlement {
    pub offer: Offer,
    pub expected_offer_revision: u32,
    pub items: Vec<ItemTransition>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OfferRepository: Send + Sync {
    /// Persist a new pending offer.
    async fn insert(&self, offer: &Offer) -> Result<(), OfferRepositoryError>;

    /// Fetch an offer by identifier.
    async fn find_by_id(&self, id: &OfferId) -> Result<Option<Offer>, OfferRepositoryError>;

    /// List offers inside `scope`, newest first.
    async fn list(&self, scope: &OfferScope) -> Result<Vec<Offer>, OfferRepositoryError>;

    /// Overwrite an offer when its stored revision equals `expected_revision`.
    async fn update(
        &self,
        offer: &Offer,
        expected_revision: u32,
    ) -> Result<(), OfferRepositoryError>;

    /// Delete an offer. Returns `false` when nothing was deleted.
    async fn delete(&self, id: &OfferId) -> Result<bool, OfferRepositoryError>;

    /// Apply a settlement atomically.
    async fn settle(&self, settlement: &OfferSettlement) -> Result<(), OfferRepositoryError>;
}
