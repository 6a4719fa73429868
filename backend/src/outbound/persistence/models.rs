//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain aggregates live
//! here so every repository decodes rows the same way.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    DisplayName, EmailAddress, Item, ItemDetails, ItemId, MediaReference, MoneyAmount, Offer,
    OfferId, OfferTerms, OfferType, PasswordDigest, Roles, User, UserId, Username,
};
use crate::domain::{ItemTitle, ports::StoredCredentials};

use super::schema::{items, offers, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub is_trade_admin: bool,
    pub is_superuser: bool,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
    pub display_name: &'a str,
    pub password_hash: &'a str,
    pub is_trade_admin: bool,
    pub is_superuser: bool,
}

/// Failure decoding a stored row into a domain value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stored {table} row {id} is invalid: {reason}")]
pub(crate) struct RowDecodeError {
    table: &'static str,
    id: Uuid,
    reason: String,
}

impl RowDecodeError {
    fn new(table: &'static str, id: Uuid, reason: impl ToString) -> Self {
        Self {
            table,
            id,
            reason: reason.to_string(),
        }
    }
}

impl UserRow {
    pub(crate) fn into_user(self) -> Result<User, RowDecodeError> {
        Ok(self.into_credentials()?.user)
    }

    pub(crate) fn into_credentials(self) -> Result<StoredCredentials, RowDecodeError> {
        let id = self.id;
        let invalid = |err| RowDecodeError::new("users", id, err);
        let user = User::new(
            UserId::from_uuid(id),
            Username::new(&self.username).map_err(invalid)?,
            EmailAddress::new(&self.email).map_err(invalid)?,
            DisplayName::new(self.display_name).map_err(invalid)?,
            Roles {
                is_trade_admin: self.is_trade_admin,
                is_superuser: self.is_superuser,
            },
        );
        Ok(StoredCredentials {
            user,
            digest: PasswordDigest::new(self.password_hash),
        })
    }
}

/// Row struct for reading from and inserting into the items table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ItemRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub address: String,
    pub image: Option<String>,
    pub status: String,
    pub revision: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset written by guarded item updates. Owner and creation time are
/// immutable.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = items)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ItemUpdate<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub location: &'a str,
    pub address: &'a str,
    pub image: Option<&'a str>,
    pub status: &'a str,
    pub revision: i32,
    pub updated_at: DateTime<Utc>,
}

/// Cast domain revision (u32) to database revision (i32).
#[expect(
    clippy::cast_possible_wrap,
    reason = "revision values are always small positive integers"
)]
pub(crate) fn revision_to_db(revision: u32) -> i32 {
    revision as i32
}

/// Cast database revision (i32) to domain revision (u32).
#[expect(
    clippy::cast_sign_loss,
    reason = "revision is always positive in database"
)]
pub(crate) fn revision_from_db(revision: i32) -> u32 {
    revision as u32
}

impl ItemRow {
    pub(crate) fn from_item(item: &Item) -> Self {
        Self {
            id: *item.id.as_uuid(),
            owner_id: *item.owner.as_uuid(),
            title: item.details.title.as_ref().to_owned(),
            description: item.details.description.clone(),
            category: item.details.category.as_str().to_owned(),
            location: item.details.location.clone(),
            address: item.details.address.clone(),
            image: item
                .details
                .image
                .as_ref()
                .map(|image| image.as_ref().to_owned()),
            status: item.status.as_str().to_owned(),
            revision: revision_to_db(item.revision),
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }

    pub(crate) fn into_item(self) -> Result<Item, RowDecodeError> {
        let id = self.id;
        let invalid = |err: String| RowDecodeError::new("items", id, err);
        let image = self
            .image
            .map(MediaReference::new)
            .transpose()
            .map_err(|err| invalid(err.to_string()))?;
        let details = ItemDetails {
            title: ItemTitle::new(&self.title).map_err(|err| invalid(err.to_string()))?,
            description: self.description,
            category: self
                .category
                .parse()
                .map_err(|err: crate::domain::ParseItemCategoryError| invalid(err.to_string()))?,
            location: self.location,
            address: self.address,
            image,
        };
        Ok(Item {
            id: ItemId::from_uuid(id),
            owner: UserId::from_uuid(self.owner_id),
            details,
            status: self
                .status
                .parse()
                .map_err(|err: crate::domain::ParseItemStatusError| invalid(err.to_string()))?,
            created_at: self.created_at,
            updated_at: self.updated_at,
            revision: revision_from_db(self.revision),
        })
    }
}

impl<'a> ItemUpdate<'a> {
    pub(crate) fn from_item(item: &'a Item) -> Self {
        Self {
            title: item.details.title.as_ref(),
            description: item.details.description.as_str(),
            category: item.details.category.as_str(),
            location: item.details.location.as_str(),
            address: item.details.address.as_str(),
            image: item.details.image.as_ref().map(AsRef::as_ref),
            status: item.status.as_str(),
            revision: revision_to_db(item.revision),
            updated_at: item.updated_at,
        }
    }
}

/// Row struct for reading from and inserting into the offers table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = offers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OfferRow {
    pub id: Uuid,
    pub item_desired_id: Uuid,
    pub offer_type: String,
    pub item_offered_id: Option<Uuid>,
    pub money_amount_cents: Option<i64>,
    pub offerer_id: Uuid,
    pub status: String,
    pub revision: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset written by guarded offer updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = offers)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct OfferUpdate<'a> {
    pub offer_type: &'a str,
    pub item_offered_id: Option<Uuid>,
    pub money_amount_cents: Option<i64>,
    pub status: &'a str,
    pub revision: i32,
    pub updated_at: DateTime<Utc>,
}

fn offer_type_str(terms: &OfferTerms) -> &'static str {
    match terms.offer_type() {
        OfferType::Item => "item",
        OfferType::Money => "money",
    }
}

impl OfferRow {
    pub(crate) fn from_offer(offer: &Offer) -> Self {
        Self {
            id: *offer.id.as_uuid(),
            item_desired_id: *offer.item_desired.as_uuid(),
            offer_type: offer_type_str(&offer.terms).to_owned(),
            item_offered_id: offer.terms.item_offered().map(|id| *id.as_uuid()),
            money_amount_cents: offer.terms.money_amount().map(MoneyAmount::cents),
            offerer_id: *offer.offerer.as_uuid(),
            status: offer.status.as_str().to_owned(),
            revision: revision_to_db(offer.revision),
            created_at: offer.created_at,
            updated_at: offer.updated_at,
        }
    }

    pub(crate) fn into_offer(self) -> Result<Offer, RowDecodeError> {
        let id = self.id;
        let invalid = |reason: String| RowDecodeError::new("offers", id, reason);
        let offer_type: OfferType = self
            .offer_type
            .parse()
            .map_err(|err: crate::domain::ParseOfferTypeError| invalid(err.to_string()))?;
        let terms = match (offer_type, self.item_offered_id, self.money_amount_cents) {
            (OfferType::Item, Some(item), None) => OfferTerms::Item {
                item_offered: ItemId::from_uuid(item),
            },
            (OfferType::Money, None, Some(cents)) => OfferTerms::Money {
                amount: MoneyAmount::from_cents(cents).map_err(|err| invalid(err.to_string()))?,
            },
            _ => return Err(invalid(format!("terms do not match offer type {offer_type}"))),
        };
        Ok(Offer {
            id: OfferId::from_uuid(id),
            item_desired: ItemId::from_uuid(self.item_desired_id),
            terms,
            offerer: UserId::from_uuid(self.offerer_id),
            status: self
                .status
                .parse()
                .map_err(|err: crate::domain::ParseOfferStatusError| invalid(err.to_string()))?,
            created_at: self.created_at,
            updated_at: self.updated_at,
            revision: revision_from_db(self.revision),
        })
    }
}

impl<'a> OfferUpdate<'a> {
    pub(crate) fn from_offer(offer: &'a Offer) -> Self {
        Self {
            offer_type: offer_type_str(&offer.terms),
            item_offered_id: offer.terms.item_offered().map(|id| *id.as_uuid()),
            money_amount_cents: offer.terms.money_amount().map(MoneyAmount::cents),
            status: offer.status.as_str(),
            revision: revision_to_db(offer.revision),
            updated_at: offer.updated_at,
        }
    }
}
