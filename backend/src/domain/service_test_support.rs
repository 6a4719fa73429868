//! Shared fixtures for domain service tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    Actor, Item, ItemDetails, ItemDetailsParts, ItemId, ItemStatus, MoneyAmount, Offer, OfferId,
    OfferTerms, Roles, UserId,
};

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 15, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub(crate) fn member() -> Actor {
    Actor::new(UserId::random(), Roles::member())
}

pub(crate) fn trade_admin() -> Actor {
    Actor::new(UserId::random(), Roles::trade_admin())
}

pub(crate) fn details(title: &str) -> ItemDetails {
    ItemDetails::try_from_parts(ItemDetailsParts {
        title,
        ..ItemDetailsParts::default()
    })
    .expect("valid details")
}

pub(crate) fn item_of(owner: &Actor, status: ItemStatus) -> Item {
    let item = Item::new(
        ItemId::random(),
        owner.id().clone(),
        details("Lab coat"),
        fixture_timestamp(),
    );
    if status == ItemStatus::Available {
        item
    } else {
        item.with_status(status, fixture_timestamp())
    }
}

pub(crate) fn money(cents: i64) -> OfferTerms {
    OfferTerms::Money {
        amount: MoneyAmount::from_cents(cents).expect("valid cents"),
    }
}

pub(crate) fn offer_on(desired: &Item, offerer: &Actor, terms: OfferTerms) -> Offer {
    Offer::new(
        OfferId::random(),
        desired.id,
        terms,
        offerer.id().clone(),
        fixture_timestamp(),
    )
}
