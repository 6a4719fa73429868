//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities for the marketplace (users, items,
//! offers), the single access policy consulted before every mutation and
//! visibility decision, and the services implementing the driving ports.
//! Types stay free of HTTP and persistence concerns.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: API error payload and stable identifiers.
//! - `User`, `Item`, `Offer`: aggregates with validated fields.
//! - `AccessPolicy`: elevated bypass, read bypass, ownership.
//! - `AccountService`, `ItemService`, `OfferService`: driving port
//!   implementations.

pub mod access;
pub mod account_service;
pub mod auth;
pub mod error;
pub mod item;
pub mod item_service;
pub mod offer;
pub mod offer_service;
pub mod ports;
#[cfg(test)]
pub(crate) mod service_test_support;
pub mod trace_id;
pub mod user;

pub use self::access::{
    AccessPolicy, Actor, ItemVisibility, OfferRelation, OfferScope, Operation,
};
pub use self::account_service::AccountService;
pub use self::auth::{
    LoginCredentials, LoginValidationError, PASSWORD_MIN, PasswordDigest, Registration,
    RegistrationParts, RegistrationValidationError,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::item::{
    ITEM_PLACE_MAX, ITEM_TITLE_MAX, Item, ItemCategory, ItemDetails, ItemDetailsParts, ItemId,
    ItemStatus, ItemTitle, ItemValidationError, MediaReference, NOT_PROVIDED,
    ParseItemCategoryError, ParseItemStatusError,
};
pub use self::item_service::ItemService;
pub use self::offer::{
    MONEY_MAX_CENTS, MoneyAmount, MoneyValidationError, Offer, OfferDecision, OfferId,
    OfferStatus, OfferTerms, OfferType, ParseOfferIdError, ParseOfferStatusError,
    ParseOfferTypeError,
};
pub use self::offer_service::OfferService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    DISPLAY_NAME_MAX, DisplayName, EmailAddress, Roles, USERNAME_MAX, USERNAME_MIN, User,
    UserId, UserValidationError, Username,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use barter_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
