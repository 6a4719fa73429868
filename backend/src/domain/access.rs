//! Authorization and visibility policy.
//!
//! Every mutation and every visibility decision goes through [`AccessPolicy`].
//! Checks run in a fixed order: elevated bypass, read bypass, then the
//! ownership relation named by the caller. Failing all three yields
//! `Forbidden`.

use crate::domain::{Error, Item, ItemStatus, Offer, Roles, User, UserId};

/// Authenticated requester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    id: UserId,
    roles: Roles,
}

impl Actor {
    /// Construct an actor from its identifier and role flags.
    pub fn new(id: UserId, roles: Roles) -> Self {
        Self { id, roles }
    }

    /// Identifier of the requester.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Role flags of the requester.
    pub fn roles(&self) -> Roles {
        self.roles
    }

    /// Whether the requester holds an elevated role.
    pub fn is_elevated(&self) -> bool {
        self.roles.is_elevated()
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self::new(user.id().clone(), user.roles())
    }
}

/// Kind of operation being authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Mutate,
}

/// Which participant relation grants access to an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferRelation {
    /// The offerer or the desired item's owner.
    Participant,
    /// Only the desired item's owner. Used for accept and refuse.
    DesiredOwner,
    /// Only the offerer. Used for revising terms.
    Offerer,
}

/// Item listing visibility derived from the requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemVisibility {
    All,
    AvailableOnly,
}

impl ItemVisibility {
    /// Whether an item with `status` passes this visibility.
    pub fn admits(self, status: ItemStatus) -> bool {
        match self {
            Self::All => true,
            Self::AvailableOnly => status == ItemStatus::Available,
        }
    }
}

/// Offer listing scope derived from the requester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfferScope {
    All,
    /// Offers where the user is offerer or desired-item owner.
    Participant(UserId),
    Nothing,
}

/// Single authorization policy for items, offers and user listings.
///
/// # Examples
/// ```
/// use barter_backend::domain::{AccessPolicy, Actor, Operation, Roles, UserId};
///
/// let admin = Actor::new(UserId::random(), Roles::trade_admin());
/// let stranger = UserId::random();
/// assert!(AccessPolicy.permits(&admin, Operation::Mutate, [&stranger]));
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct AccessPolicy;

impl AccessPolicy {
    /// Core predicate: elevated bypass, read bypass, then ownership.
    pub fn permits<'a>(
        self,
        actor: &Actor,
        operation: Operation,
        owners: impl IntoIterator<Item = &'a UserId>,
    ) -> bool {
        if actor.is_elevated() {
            return true;
        }
        if operation == Operation::Read {
            return true;
        }
        owners.into_iter().any(|owner| owner == actor.id())
    }

    /// Authorize an operation on an item.
    pub fn authorize_item(
        self,
        actor: &Actor,
        item: &Item,
        operation: Operation,
    ) -> Result<(), Error> {
        if self.permits(actor, operation, [&item.owner]) {
            Ok(())
        } else {
            Err(Error::forbidden("only the item owner may modify this item"))
        }
    }

    /// Authorize an operation on an offer under the given relation.
    pub fn authorize_offer(
        self,
        actor: &Actor,
        offer: &Offer,
        desired_owner: &UserId,
        relation: OfferRelation,
        operation: Operation,
    ) -> Result<(), Error> {
        let permitted = match relation {
            OfferRelation::Participant => {
                self.permits(actor, operation, [&offer.offerer, desired_owner])
            }
            OfferRelation::DesiredOwner => self.permits(actor, operation, [desired_owner]),
            OfferRelation::Offerer => self.permits(actor, operation, [&offer.offerer]),
        };
        if permitted {
            Ok(())
        } else {
            Err(Error::forbidden(match relation {
                OfferRelation::Participant => "only offer participants may modify this offer",
                OfferRelation::DesiredOwner => {
                    "only the desired item's owner may decide this offer"
                }
                OfferRelation::Offerer => "only the offerer may revise this offer",
            }))
        }
    }

    /// Require an elevated role.
    pub fn require_elevated(self, actor: &Actor) -> Result<(), Error> {
        if actor.is_elevated() {
            Ok(())
        } else {
            Err(Error::forbidden("elevated role required"))
        }
    }

    /// Listing visibility for items.
    pub fn item_visibility(self, actor: Option<&Actor>) -> ItemVisibility {
        match actor {
            Some(actor) if actor.is_elevated() => ItemVisibility::All,
            _ => ItemVisibility::AvailableOnly,
        }
    }

    /// Whether a single item may be retrieved. Owners always see their own items.
    pub fn item_visible(self, actor: Option<&Actor>, item: &Item) -> bool {
        if actor.is_some_and(|actor| item.is_owned_by(actor.id())) {
            return true;
        }
        self.item_visibility(actor).admits(item.status)
    }

    /// Listing scope for offers.
    pub fn offer_scope(self, actor: Option<&Actor>) -> OfferScope {
        match actor {
            Some(actor) if actor.is_elevated() => OfferScope::All,
            Some(actor) => OfferScope::Participant(actor.id().clone()),
            None => OfferScope::Nothing,
        }
    }

    /// Whether a single offer may be retrieved.
    pub fn offer_visible(
        self,
        actor: Option<&Actor>,
        offer: &Offer,
        desired_owner: &UserId,
    ) -> bool {
        match self.offer_scope(actor) {
            OfferScope::All => true,
            OfferScope::Participant(user) => offer.offerer == user || *desired_owner == user,
            OfferScope::Nothing => false,
        }
    }
}

#[cfg(test)]
mod tests;
