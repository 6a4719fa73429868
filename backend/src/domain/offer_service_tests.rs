//! Tests for the offer service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{ItemRepositoryError, MockItemRepository, MockOfferRepository};
use crate::domain::service_test_support::{
    fixture_clock, fixture_timestamp, item_of, member, money, offer_on, trade_admin,
};
use crate::domain::{ErrorCode, OfferStatus};
use rstest::rstest;

type Service = OfferService<MockOfferRepository, MockItemRepository>;

fn make_service(offers: MockOfferRepository, items: MockItemRepository) -> Service {
    OfferService::new(Arc::new(offers), Arc::new(items), fixture_clock())
}

fn items_returning(stored: Vec<Item>) -> MockItemRepository {
    let mut items = MockItemRepository::new();
    items.expect_find_by_id().returning(move |id| {
        Ok(stored.iter().find(|item| item.id == *id).cloned())
    });
    items
}

fn offers_returning(offer: Offer) -> MockOfferRepository {
    let mut offers = MockOfferRepository::new();
    offers
        .expect_find_by_id()
        .returning(move |_| Ok(Some(offer.clone())));
    offers
}

#[rstest]
#[tokio::test]
async fn money_offer_is_created_pending() {
    let owner = member();
    let buyer = member();
    let desired = item_of(&owner, ItemStatus::Available);
    let mut offers = MockOfferRepository::new();
    let buyer_id = buyer.id().clone();
    offers
        .expect_insert()
        .withf(move |offer| offer.offerer == buyer_id && offer.status == OfferStatus::Pending)
        .times(1)
        .return_once(|_| Ok(()));

    let offer = make_service(offers, items_returning(vec![desired.clone()]))
        .create(CreateOfferRequest {
            actor: buyer,
            item_desired: desired.id,
            terms: money(5000),
        })
        .await
        .expect("offer created");
    assert_eq!(offer.item_desired, desired.id);
    assert_eq!(offer.terms, money(5000));
}

#[rstest]
#[tokio::test]
async fn offers_on_own_items_are_denied() {
    let owner = member();
    let desired = item_of(&owner, ItemStatus::Available);
    let mut offers = MockOfferRepository::new();
    offers.expect_insert().never();

    let err = make_service(offers, items_returning(vec![desired.clone()]))
        .create(CreateOfferRequest {
            actor: owner,
            item_desired: desired.id,
            terms: money(100),
        })
        .await
        .expect_err("self offer");
    assert_eq!(err.code(), ErrorCode::SelfOfferDenied);
}

#[rstest]
#[tokio::test]
async fn offered_item_must_exist() {
    let desired = item_of(&member(), ItemStatus::Available);
    let err = make_service(MockOfferRepository::new(), items_returning(vec![desired.clone()]))
        .create(CreateOfferRequest {
            actor: member(),
            item_desired: desired.id,
            terms: OfferTerms::Item {
                item_offered: ItemId::random(),
            },
        })
        .await
        .expect_err("missing counter item");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case::foreign_item(false, ItemStatus::Available)]
#[case::traded_item(true, ItemStatus::Traded)]
#[tokio::test]
async fn offered_item_must_be_tradeable_by_offerer(
    #[case] owned_by_offerer: bool,
    #[case] status: ItemStatus,
) {
    let buyer = member();
    let desired = item_of(&member(), ItemStatus::Available);
    let offered_owner = if owned_by_offerer { buyer.clone() } else { member() };
    let offered = item_of(&offered_owner, status);

    let err = make_service(
        MockOfferRepository::new(),
        items_returning(vec![desired.clone(), offered.clone()]),
    )
    .create(CreateOfferRequest {
        actor: buyer,
        item_desired: desired.id,
        terms: OfferTerms::Item {
            item_offered: offered.id,
        },
    })
    .await
    .expect_err("invalid counter item");
    assert_eq!(err.code(), ErrorCode::InvalidOffer);
}

#[rstest]
#[case(ItemStatus::Unavailable)]
#[case(ItemStatus::Traded)]
#[tokio::test]
async fn desired_item_must_be_available(#[case] status: ItemStatus) {
    let desired = item_of(&member(), status);
    let err = make_service(MockOfferRepository::new(), items_returning(vec![desired.clone()]))
        .create(CreateOfferRequest {
            actor: member(),
            item_desired: desired.id,
            terms: money(100),
        })
        .await
        .expect_err("desired item not open for offers");
    assert_eq!(err.code(), ErrorCode::InvalidOffer);
}

#[rstest]
#[tokio::test]
async fn accepting_item_offer_trades_both_items_in_one_settlement() {
    let owner = member();
    let buyer = member();
    let desired = item_of(&owner, ItemStatus::Available);
    let offered = item_of(&buyer, ItemStatus::Available);
    let offer = offer_on(
        &desired,
        &buyer,
        OfferTerms::Item {
            item_offered: offered.id,
        },
    );

    let mut offers = offers_returning(offer.clone());
    let (desired_id, offered_id) = (desired.id, offered.id);
    offers
        .expect_settle()
        .withf(move |settlement| {
            let traded: Vec<_> = settlement.items.iter().map(|t| t.item.id).collect();
            settlement.offer.status == OfferStatus::Accepted
                && settlement.expected_offer_revision == 1
                && traded == vec![desired_id, offered_id]
                && settlement
                    .items
                    .iter()
                    .all(|t| t.item.status == ItemStatus::Traded && t.expected_revision == 1)
        })
        .times(1)
        .return_once(|_| Ok(()));

    let decided = make_service(offers, items_returning(vec![desired, offered]))
        .decide(DecideOfferRequest {
            actor: owner,
            offer_id: offer.id,
            decision: OfferDecision::Accept,
        })
        .await
        .expect("owner accepts");
    assert_eq!(decided.status, OfferStatus::Accepted);
    assert_eq!(decided.revision, 2);
}

#[rstest]
#[tokio::test]
async fn accepting_money_offer_trades_only_desired_item() {
    let owner = member();
    let desired = item_of(&owner, ItemStatus::Available);
    let offer = offer_on(&desired, &member(), money(5000));

    let mut offers = offers_returning(offer.clone());
    let desired_id = desired.id;
    offers
        .expect_settle()
        .withf(move |settlement| {
            settlement.items.len() == 1 && settlement.items[0].item.id == desired_id
        })
        .times(1)
        .return_once(|_| Ok(()));

    make_service(offers, items_returning(vec![desired]))
        .decide(DecideOfferRequest {
            actor: owner,
            offer_id: offer.id,
            decision: OfferDecision::Accept,
        })
        .await
        .expect("owner accepts");
}

#[rstest]
#[tokio::test]
async fn refusing_leaves_items_untouched() {
    let owner = member();
    let desired = item_of(&owner, ItemStatus::Available);
    let offer = offer_on(&desired, &member(), money(5000));

    let mut offers = offers_returning(offer.clone());
    offers
        .expect_settle()
        .withf(|settlement| {
            settlement.items.is_empty() && settlement.offer.status == OfferStatus::Refused
        })
        .times(1)
        .return_once(|_| Ok(()));

    let decided = make_service(offers, items_returning(vec![desired]))
        .decide(DecideOfferRequest {
            actor: trade_admin(),
            offer_id: offer.id,
            decision: OfferDecision::Refuse,
        })
        .await
        .expect("admin refuses");
    assert_eq!(decided.status, OfferStatus::Refused);
}

#[rstest]
#[tokio::test]
async fn only_the_desired_owner_decides() {
    let buyer = member();
    let desired = item_of(&member(), ItemStatus::Available);
    let offer = offer_on(&desired, &buyer, money(5000));
    let mut offers = offers_returning(offer.clone());
    offers.expect_settle().never();

    let err = make_service(offers, items_returning(vec![desired]))
        .decide(DecideOfferRequest {
            actor: buyer,
            offer_id: offer.id,
            decision: OfferDecision::Accept,
        })
        .await
        .expect_err("offerer cannot accept");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[case(OfferDecision::Accept)]
#[case(OfferDecision::Refuse)]
#[tokio::test]
async fn resolved_offers_cannot_be_decided_again(#[case] decision: OfferDecision) {
    let owner = member();
    let desired = item_of(&owner, ItemStatus::Available);
    let offer = offer_on(&desired, &member(), money(5000))
        .decided(OfferDecision::Refuse, fixture_timestamp());
    let mut offers = offers_returning(offer.clone());
    offers.expect_settle().never();

    let err = make_service(offers, items_returning(vec![desired]))
        .decide(DecideOfferRequest {
            actor: owner,
            offer_id: offer.id,
            decision,
        })
        .await
        .expect_err("already resolved");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn accepting_against_a_traded_item_conflicts() {
    let owner = member();
    let desired = item_of(&owner, ItemStatus::Traded);
    let offer = offer_on(&desired, &member(), money(5000));
    let mut offers = offers_returning(offer.clone());
    offers.expect_settle().never();

    let err = make_service(offers, items_returning(vec![desired]))
        .decide(DecideOfferRequest {
            actor: owner,
            offer_id: offer.id,
            decision: OfferDecision::Accept,
        })
        .await
        .expect_err("desired already traded");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn settlement_conflicts_surface_as_conflict() {
    let owner = member();
    let desired = item_of(&owner, ItemStatus::Available);
    let offer = offer_on(&desired, &member(), money(5000));
    let mut offers = offers_returning(offer.clone());
    offers
        .expect_settle()
        .return_once(|_| Err(OfferRepositoryError::conflict("item revision changed")));

    let err = make_service(offers, items_returning(vec![desired]))
        .decide(DecideOfferRequest {
            actor: owner,
            offer_id: offer.id,
            decision: OfferDecision::Accept,
        })
        .await
        .expect_err("lost the race");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn offerer_revises_pending_terms() {
    let buyer = member();
    let desired = item_of(&member(), ItemStatus::Available);
    let offer = offer_on(&desired, &buyer, money(5000));
    let mut offers = offers_returning(offer.clone());
    offers
        .expect_update()
        .withf(|revised, expected| revised.terms == money(7500) && *expected == 1)
        .times(1)
        .return_once(|_, _| Ok(()));

    let revised = make_service(offers, items_returning(vec![desired]))
        .revise(ReviseOfferRequest {
            actor: buyer,
            offer_id: offer.id,
            terms: money(7500),
        })
        .await
        .expect("offerer revises");
    assert_eq!(revised.revision, 2);
}

#[rstest]
#[tokio::test]
async fn desired_owner_cannot_revise_terms() {
    let owner = member();
    let desired = item_of(&owner, ItemStatus::Available);
    let offer = offer_on(&desired, &member(), money(5000));
    let mut offers = offers_returning(offer.clone());
    offers.expect_update().never();

    let err = make_service(offers, items_returning(vec![desired]))
        .revise(ReviseOfferRequest {
            actor: owner,
            offer_id: offer.id,
            terms: money(1),
        })
        .await
        .expect_err("owner cannot revise");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn participants_may_withdraw_offers() {
    let owner = member();
    let desired = item_of(&owner, ItemStatus::Available);
    let offer = offer_on(&desired, &member(), money(5000));
    let mut offers = offers_returning(offer.clone());
    offers.expect_delete().times(1).return_once(|_| Ok(true));

    make_service(offers, items_returning(vec![desired]))
        .delete(owner, offer.id)
        .await
        .expect("owner withdraws");
}

#[rstest]
#[tokio::test]
async fn anonymous_listing_is_empty_without_touching_storage() {
    let mut offers = MockOfferRepository::new();
    offers.expect_list().never();

    let listed = make_service(offers, MockItemRepository::new())
        .list(None)
        .await
        .expect("anonymous listing");
    assert!(listed.is_empty());
}

#[rstest]
#[tokio::test]
async fn members_list_offers_they_participate_in() {
    let actor = member();
    let expected = OfferScope::Participant(actor.id().clone());
    let mut offers = MockOfferRepository::new();
    offers
        .expect_list()
        .withf(move |scope| *scope == expected)
        .times(1)
        .return_once(|_| Ok(Vec::new()));

    make_service(offers, MockItemRepository::new())
        .list(Some(actor))
        .await
        .expect("member listing");
}

#[rstest]
#[tokio::test]
async fn strangers_cannot_read_offers() {
    let desired = item_of(&member(), ItemStatus::Available);
    let offer = offer_on(&desired, &member(), money(5000));

    let err = make_service(offers_returning(offer.clone()), items_returning(vec![desired]))
        .get(Some(member()), offer.id)
        .await
        .expect_err("hidden from strangers");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn item_lookup_failures_propagate() {
    let mut items = MockItemRepository::new();
    items
        .expect_find_by_id()
        .return_once(|_| Err(ItemRepositoryError::query("boom")));

    let err = make_service(MockOfferRepository::new(), items)
        .create(CreateOfferRequest {
            actor: member(),
            item_desired: ItemId::random(),
            terms: money(100),
        })
        .await
        .expect_err("query failure");
    assert_eq!(err.code(), ErrorCode::InternalError);
}
