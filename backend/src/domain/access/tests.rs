//! Tests for the authorization and visibility policy.

use super::*;
use crate::domain::{
    ErrorCode, ItemDetails, ItemDetailsParts, ItemId, MoneyAmount, OfferId, OfferTerms,
};
use chrono::Utc;
use rstest::{fixture, rstest};

struct Cast {
    owner: Actor,
    offerer: Actor,
    stranger: Actor,
    admin: Actor,
    superuser: Actor,
}

#[fixture]
fn cast() -> Cast {
    Cast {
        owner: Actor::new(UserId::random(), Roles::member()),
        offerer: Actor::new(UserId::random(), Roles::member()),
        stranger: Actor::new(UserId::random(), Roles::member()),
        admin: Actor::new(UserId::random(), Roles::trade_admin()),
        superuser: Actor::new(UserId::random(), Roles::superuser()),
    }
}

fn item_owned_by(owner: &UserId, status: ItemStatus) -> Item {
    let details = ItemDetails::try_from_parts(ItemDetailsParts {
        title: "Desk lamp",
        ..ItemDetailsParts::default()
    })
    .expect("valid details");
    Item::new(ItemId::random(), owner.clone(), details, Utc::now()).with_status(status, Utc::now())
}

fn offer_by(offerer: &UserId, item: &Item) -> Offer {
    let amount = MoneyAmount::from_cents(5000).expect("valid cents");
    Offer::new(
        OfferId::random(),
        item.id,
        OfferTerms::Money { amount },
        offerer.clone(),
        Utc::now(),
    )
}

#[rstest]
fn owners_and_elevated_roles_may_mutate_items(cast: Cast) {
    let item = item_owned_by(cast.owner.id(), ItemStatus::Available);
    for actor in [&cast.owner, &cast.admin, &cast.superuser] {
        assert!(AccessPolicy.authorize_item(actor, &item, Operation::Mutate).is_ok());
    }
}

#[rstest]
fn strangers_are_forbidden_from_mutating_items(cast: Cast) {
    let item = item_owned_by(cast.owner.id(), ItemStatus::Available);
    let err = AccessPolicy
        .authorize_item(&cast.stranger, &item, Operation::Mutate)
        .expect_err("stranger cannot mutate");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
fn reads_bypass_ownership(cast: Cast) {
    let item = item_owned_by(cast.owner.id(), ItemStatus::Available);
    assert!(AccessPolicy.authorize_item(&cast.stranger, &item, Operation::Read).is_ok());
}

#[rstest]
#[case(OfferRelation::DesiredOwner, true, false)]
#[case(OfferRelation::Offerer, false, true)]
#[case(OfferRelation::Participant, true, true)]
fn offer_relations_select_the_right_participant(
    cast: Cast,
    #[case] relation: OfferRelation,
    #[case] owner_allowed: bool,
    #[case] offerer_allowed: bool,
) {
    let item = item_owned_by(cast.owner.id(), ItemStatus::Available);
    let offer = offer_by(cast.offerer.id(), &item);
    let check = |actor: &Actor| {
        AccessPolicy
            .authorize_offer(actor, &offer, &item.owner, relation, Operation::Mutate)
            .is_ok()
    };

    assert_eq!(check(&cast.owner), owner_allowed);
    assert_eq!(check(&cast.offerer), offerer_allowed);
    assert!(!check(&cast.stranger));
    assert!(check(&cast.admin));
    assert!(check(&cast.superuser));
}

#[rstest]
fn ordinary_users_only_list_available_items(cast: Cast) {
    assert_eq!(AccessPolicy.item_visibility(None), ItemVisibility::AvailableOnly);
    assert_eq!(
        AccessPolicy.item_visibility(Some(&cast.owner)),
        ItemVisibility::AvailableOnly
    );
    assert_eq!(AccessPolicy.item_visibility(Some(&cast.admin)), ItemVisibility::All);
    assert_eq!(
        AccessPolicy.item_visibility(Some(&cast.superuser)),
        ItemVisibility::All
    );
}

#[rstest]
#[case(ItemStatus::Available, true)]
#[case(ItemStatus::Unavailable, false)]
#[case(ItemStatus::Traded, false)]
fn retrieval_follows_visibility_except_for_owners(
    cast: Cast,
    #[case] status: ItemStatus,
    #[case] visible_to_others: bool,
) {
    let item = item_owned_by(cast.owner.id(), status);
    assert!(AccessPolicy.item_visible(Some(&cast.owner), &item));
    assert!(AccessPolicy.item_visible(Some(&cast.admin), &item));
    assert_eq!(
        AccessPolicy.item_visible(Some(&cast.stranger), &item),
        visible_to_others
    );
    assert_eq!(AccessPolicy.item_visible(None, &item), visible_to_others);
}

#[rstest]
fn offer_scope_depends_on_actor(cast: Cast) {
    assert_eq!(AccessPolicy.offer_scope(None), OfferScope::Nothing);
    assert_eq!(AccessPolicy.offer_scope(Some(&cast.admin)), OfferScope::All);
    assert_eq!(
        AccessPolicy.offer_scope(Some(&cast.offerer)),
        OfferScope::Participant(cast.offerer.id().clone())
    );
}

#[rstest]
fn offers_are_visible_to_participants_only(cast: Cast) {
    let item = item_owned_by(cast.owner.id(), ItemStatus::Available);
    let offer = offer_by(cast.offerer.id(), &item);

    assert!(AccessPolicy.offer_visible(Some(&cast.owner), &offer, &item.owner));
    assert!(AccessPolicy.offer_visible(Some(&cast.offerer), &offer, &item.owner));
    assert!(AccessPolicy.offer_visible(Some(&cast.admin), &offer, &item.owner));
    assert!(!AccessPolicy.offer_visible(Some(&cast.stranger), &offer, &item.owner));
    assert!(!AccessPolicy.offer_visible(None, &offer, &item.owner));
}

#[rstest]
fn user_listing_requires_elevation(cast: Cast) {
    assert!(AccessPolicy.require_elevated(&cast.admin).is_ok());
    assert!(AccessPolicy.require_elevated(&cast.superuser).is_ok());
    let err = AccessPolicy
        .require_elevated(&cast.owner)
        .expect_err("member cannot list users");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}
