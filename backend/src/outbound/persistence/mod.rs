//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the user, item and offer repository ports,
//! backed by PostgreSQL through `diesel-async` with `bb8` pooling.
//!
//! - Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//!   private to this module.
//! - Writes to items and offers are guarded by a `revision` column.
//! - Offer settlement runs in a single transaction.
//!
//! # Example
//!
//! ```no_run
//! use barter_backend::outbound::persistence::{DbPool, DieselItemRepository, PoolConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/trade")).await?;
//! let items = DieselItemRepository::new(pool);
//! # let _ = items;
//! # Ok(())
//! # }
//! ```

mod diesel_basic_error_mapping;
mod diesel_item_repository;
mod diesel_offer_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_item_repository::DieselItemRepository;
pub use diesel_offer_repository::DieselOfferRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
