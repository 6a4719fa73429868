//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, hasher, media resolver) describe what the
//! domain needs from adapters. Driving ports (login, accounts, items,
//! offers) describe what inbound adapters may ask of the domain. Each driven
//! port exposes a typed error generated by [`define_port_error`] so adapters
//! map their failures into predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod credential_hasher;
mod item_command;
mod item_query;
mod item_repository;
mod login_service;
mod media_resolver;
mod offer_command;
mod offer_query;
mod offer_repository;
mod user_repository;
mod users_query;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::AccountCommand;
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHasher, CredentialHasherError};
#[cfg(test)]
pub use item_command::MockItemCommand;
pub use item_command::{
    ChangeItemStatusRequest, CreateItemRequest, ItemCommand, UpdateItemRequest,
};
#[cfg(test)]
pub use item_query::MockItemQuery;
pub use item_query::{ItemQuery, ListItemsRequest};
#[cfg(test)]
pub use item_repository::MockItemRepository;
pub use item_repository::{ItemListFilter, ItemRepository, ItemRepositoryError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use media_resolver::MockMediaResolver;
pub use media_resolver::MediaResolver;
#[cfg(test)]
pub use offer_command::MockOfferCommand;
pub use offer_command::{CreateOfferRequest, DecideOfferRequest, OfferCommand, ReviseOfferRequest};
#[cfg(test)]
pub use offer_query::MockOfferQuery;
pub use offer_query::OfferQuery;
#[cfg(test)]
pub use offer_repository::MockOfferRepository;
pub use offer_repository::{
    ItemTransition, OfferRepository, OfferRepositoryError, OfferSettlement,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{StoredCredentials, UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
