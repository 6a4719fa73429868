//! Offer lifecycle services.
//!
//! Implements [`OfferCommand`] and [`OfferQuery`]. Creation validates the
//! offer against the items it references; decisions are applied through a
//! single [`OfferSettlement`] so the offer and any traded items change
//! together or not at all.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::item_service::{item_not_found, map_item_error};
use crate::domain::ports::{
    CreateOfferRequest, DecideOfferRequest, ItemRepository, ItemTransition, OfferCommand,
    OfferQuery, OfferRepository, OfferRepositoryError, OfferSettlement, ReviseOfferRequest,
};
use crate::domain::{
    AccessPolicy, Actor, Error, Item, ItemId, ItemStatus, Offer, OfferDecision, OfferId,
    OfferRelation, OfferScope, OfferTerms, Operation, UserId,
};

/// Offer service implementing the offer driving ports.
#[derive(Clone)]
pub struct OfferService<O, I> {
    offers: Arc<O>,
    items: Arc<I>,
    clock: Arc<dyn Clock>,
    policy: AccessPolicy,
}

impl<O, I> OfferService<O, I> {
    /// Create a new service over the offer and item repositories.
    pub fn new(offers: Arc<O>, items: Arc<I>, clock: Arc<dyn Clock>) -> Self {
        Self {
            offers,
            items,
            clock,
            policy: AccessPolicy,
        }
    }
}

fn map_offer_error(error: OfferRepositoryError) -> Error {
    match error {
        OfferRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("offer repository unavailable: {message}"))
        }
        OfferRepositoryError::Query { message } => {
            Error::internal(format!("offer repository error: {message}"))
        }
        OfferRepositoryError::Conflict { message } => Error::conflict(message),
    }
}

fn offer_not_found(id: &OfferId) -> Error {
    Error::not_found(format!("offer {id} not found"))
}

fn ensure_pending(offer: &Offer) -> Result<(), Error> {
    if offer.status.is_resolved() {
        Err(Error::conflict(format!(
            "offer already resolved as {}",
            offer.status
        )))
    } else {
        Ok(())
    }
}

/// Check that a counter-item can be offered by `offerer`.
fn validate_item_offered(offered: &Item, offerer: &UserId) -> Result<(), Error> {
    if !offered.is_owned_by(offerer) {
        return Err(Error::invalid_offer("item_offered must belong to the offerer"));
    }
    if offered.status.is_traded() {
        return Err(Error::invalid_offer("item_offered has already been traded"));
    }
    Ok(())
}

impl<O, I> OfferService<O, I>
where
    O: OfferRepository,
    I: ItemRepository,
{
    async fn load_item(&self, id: &ItemId) -> Result<Item, Error> {
        self.items
            .find_by_id(id)
            .await
            .map_err(map_item_error)?
            .ok_or_else(|| item_not_found(id))
    }

    async fn load_offer(&self, id: &OfferId) -> Result<Offer, Error> {
        self.offers
            .find_by_id(id)
            .await
            .map_err(map_offer_error)?
            .ok_or_else(|| offer_not_found(id))
    }

    /// Load an offer with its desired item and authorize `relation`.
    async fn load_authorized(
        &self,
        actor: &Actor,
        offer_id: &OfferId,
        relation: OfferRelation,
    ) -> Result<(Offer, Item), Error> {
        let offer = self.load_offer(offer_id).await?;
        let desired = self.load_item(&offer.item_desired).await?;
        self.policy
            .authorize_offer(actor, &offer, &desired.owner, relation, Operation::Mutate)?;
        Ok((offer, desired))
    }

    /// Validate the counter-item named by `terms`, if any.
    async fn validate_terms(&self, terms: &OfferTerms, offerer: &UserId) -> Result<(), Error> {
        if let Some(offered_id) = terms.item_offered() {
            let offered = self.load_item(&offered_id).await?;
            validate_item_offered(&offered, offerer)?;
        }
        Ok(())
    }

    fn traded_transition(&self, item: &Item) -> Result<ItemTransition, Error> {
        if item.status.is_traded() {
            return Err(Error::conflict(format!("item {} has already been traded", item.id)));
        }
        Ok(ItemTransition {
            item: item.with_status(ItemStatus::Traded, self.clock.utc()),
            expected_revision: item.revision,
        })
    }

    async fn settlement(
        &self,
        offer: &Offer,
        desired: &Item,
        decision: OfferDecision,
    ) -> Result<OfferSettlement, Error> {
        let mut items = Vec::new();
        if decision == OfferDecision::Accept {
            items.push(self.traded_transition(desired)?);
            if let Some(offered_id) = offer.terms.item_offered() {
                let offered = self.load_item(&offered_id).await?;
                items.push(self.traded_transition(&offered)?);
            }
        }
        Ok(OfferSettlement {
            offer: offer.decided(decision, self.clock.utc()),
            expected_offer_revision: offer.revision,
            items,
        })
    }
}

#[async_trait]
impl<O, I> OfferCommand for OfferService<O, I>
where
    O: OfferRepository,
    I: ItemRepository,
{
    async fn create(&self, request: CreateOfferRequest) -> Result<Offer, Error> {
        let CreateOfferRequest {
            actor,
            item_desired,
            terms,
        } = request;

        let desired = self.load_item(&item_desired).await?;
        let offered = match terms.item_offered() {
            Some(id) => Some(self.load_item(&id).await?),
            None => None,
        };
        if desired.is_owned_by(actor.id()) {
            return Err(Error::self_offer_denied(
                "you cannot make an offer on your own item",
            ));
        }
        if let Some(offered) = &offered {
            validate_item_offered(offered, actor.id())?;
        }
        if desired.status != ItemStatus::Available {
            return Err(Error::invalid_offer(format!(
                "item_desired is {}, only available items accept offers",
                desired.status
            )));
        }

        let offer = Offer::new(
            OfferId::random(),
            item_desired,
            terms,
            actor.id().clone(),
            self.clock.utc(),
        );
        self.offers.insert(&offer).await.map_err(map_offer_error)?;

        info!(
            offer_id = %offer.id,
            item_desired = %offer.item_desired,
            offer_type = %offer.terms.offer_type(),
            offerer = %offer.offerer,
            "offer created"
        );
        Ok(offer)
    }

    async fn revise(&self, request: ReviseOfferRequest) -> Result<Offer, Error> {
        let ReviseOfferRequest {
            actor,
            offer_id,
            terms,
        } = request;
        let (offer, _) = self
            .load_authorized(&actor, &offer_id, OfferRelation::Offerer)
            .await?;
        ensure_pending(&offer)?;
        self.validate_terms(&terms, &offer.offerer).await?;

        let revised = offer.with_terms(terms, self.clock.utc());
        self.offers
            .update(&revised, offer.revision)
            .await
            .map_err(map_offer_error)?;

        info!(offer_id = %offer_id, actor = %actor.id(), "offer terms revised");
        Ok(revised)
    }

    async fn decide(&self, request: DecideOfferRequest) -> Result<Offer, Error> {
        let DecideOfferRequest {
            actor,
            offer_id,
            decision,
        } = request;
        let (offer, desired) = self
            .load_authorized(&actor, &offer_id, OfferRelation::DesiredOwner)
            .await?;
        ensure_pending(&offer)?;

        let settlement = self.settlement(&offer, &desired, decision).await?;
        self.offers
            .settle(&settlement)
            .await
            .map_err(map_offer_error)?;

        let traded: Vec<String> = settlement
            .items
            .iter()
            .map(|transition| transition.item.id.to_string())
            .collect();
        info!(
            offer_id = %offer_id,
            actor = %actor.id(),
            decision = %decision,
            traded_items = ?traded,
            "offer settled"
        );
        Ok(settlement.offer)
    }

    async fn delete(&self, actor: Actor, offer_id: OfferId) -> Result<(), Error> {
        self.load_authorized(&actor, &offer_id, OfferRelation::Participant)
            .await?;
        if !self.offers.delete(&offer_id).await.map_err(map_offer_error)? {
            return Err(offer_not_found(&offer_id));
        }

        info!(offer_id = %offer_id, actor = %actor.id(), "offer withdrawn");
        Ok(())
    }
}

#[async_trait]
impl<O, I> OfferQuery for OfferService<O, I>
where
    O: OfferRepository,
    I: ItemRepository,
{
    async fn list(&self, actor: Option<Actor>) -> Result<Vec<Offer>, Error> {
        match self.policy.offer_scope(actor.as_ref()) {
            OfferScope::Nothing => Ok(Vec::new()),
            scope => self.offers.list(&scope).await.map_err(map_offer_error),
        }
    }

    async fn get(&self, actor: Option<Actor>, offer_id: OfferId) -> Result<Offer, Error> {
        if actor.is_none() {
            return Err(offer_not_found(&offer_id));
        }
        let offer = self.load_offer(&offer_id).await?;
        let desired = self.load_item(&offer.item_desired).await?;
        if self
            .policy
            .offer_visible(actor.as_ref(), &offer, &desired.owner)
        {
            Ok(offer)
        } else {
            Err(offer_not_found(&offer_id))
        }
    }
}

#[cfg(test)]
#[path = "offer_service_tests.rs"]
mod tests;
