//! Driving port for offer reads.

use async_trait::async_trait;

use crate::domain::{Actor, Error, Offer, OfferId};

/// Driving port for offer reads.
///
/// Anonymous requesters see no offers; participants see their own.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OfferQuery: Send + Sync {
    /// Offers visible to the requester, newest first.
    async fn list(&self, actor: Option<Actor>) -> Result<Vec<Offer>, Error>;

    /// One offer, or `NotFound` when it is absent or hidden from the requester.
    async fn get(&self, actor: Option<Actor>, offer_id: OfferId) -> Result<Offer, Error>;
}
