//! Driving port for offer mutations and decisions.

use async_trait::async_trait;

use crate::domain::{Actor, Error, ItemId, Offer, OfferDecision, OfferId, OfferTerms};

/// Request to place an offer on another user's item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOfferRequest {
    pub actor: Actor,
    pub item_desired: ItemId,
    pub terms: OfferTerms,
}

/// Request to replace the terms of a pending offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviseOfferRequest {
    pub actor: Actor,
    pub offer_id: OfferId,
    pub terms: OfferTerms,
}

/// Request to accept or refuse an offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecideOfferRequest {
    pub actor: Actor,
    pub offer_id: OfferId,
    pub decision: OfferDecision,
}

/// Driving port for the offer lifecycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OfferCommand: Send + Sync {
    /// Validate and persist a pending offer.
    async fn create(&self, request: CreateOfferRequest) -> Result<Offer, Error>;

    /// Replace the terms of a pending offer.
    async fn revise(&self, request: ReviseOfferRequest) -> Result<Offer, Error>;

    /// Accept or refuse a pending offer. Acceptance trades the items involved.
    async fn decide(&self, request: DecideOfferRequest) -> Result<Offer, Error>;

    /// Withdraw an offer.
    async fn delete(&self, actor: Actor, offer_id: OfferId) -> Result<(), Error>;
}
