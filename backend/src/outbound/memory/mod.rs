//! In-process marketplace store.
//!
//! Implements the user, item and offer repository ports over one mutex so
//! settlement is atomic exactly as it is in PostgreSQL. Used when no
//! database URL is configured and by the HTTP scenario tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    ItemListFilter, ItemRepository, ItemRepositoryError, OfferRepository, OfferRepositoryError,
    OfferSettlement, StoredCredentials, UserPersistenceError, UserRepository,
};
use crate::domain::{Item, ItemId, Offer, OfferId, OfferScope, PasswordDigest, User, UserId};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, StoredCredentials>,
    /// Insertion order, oldest first.
    items: Vec<Item>,
    /// Insertion order, oldest first.
    offers: Vec<Offer>,
}

impl Tables {
    fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == *id)
    }

    fn item_index(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == *id)
    }

    fn offer_index(&self, id: &OfferId) -> Option<usize> {
        self.offers.iter().position(|offer| offer.id == *id)
    }

    fn offer_in_scope(&self, offer: &Offer, scope: &OfferScope) -> bool {
        match scope {
            OfferScope::All => true,
            OfferScope::Participant(user) => {
                offer.offerer == *user
                    || self
                        .item(&offer.item_desired)
                        .is_some_and(|item| item.is_owned_by(user))
            }
            OfferScope::Nothing => false,
        }
    }
}

/// Mutex-guarded store implementing every repository port.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use barter_backend::outbound::memory::InMemoryMarketplace;
///
/// let store = Arc::new(InMemoryMarketplace::default());
/// let _shared = Arc::clone(&store);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryMarketplace {
    tables: Mutex<Tables>,
}

const POISONED: &str = "in-memory store lock poisoned";

impl InMemoryMarketplace {
    fn lock(&self) -> Option<MutexGuard<'_, Tables>> {
        self.tables.lock().ok()
    }

    /// Seed an account with explicit role flags.
    ///
    /// Elevated roles are never granted through the API, so development
    /// setups and tests use this to create administrators.
    pub fn seed_user(&self, user: User, digest: PasswordDigest) -> bool {
        let Some(mut tables) = self.lock() else {
            return false;
        };
        if tables
            .users
            .values()
            .any(|stored| stored.user.username() == user.username())
        {
            return false;
        }
        tables
            .users
            .insert(user.id().clone(), StoredCredentials { user, digest });
        true
    }
}

#[async_trait]
impl UserRepository for InMemoryMarketplace {
    async fn insert(
        &self,
        user: &User,
        digest: &PasswordDigest,
    ) -> Result<(), UserPersistenceError> {
        if self.seed_user(user.clone(), digest.clone()) {
            return Ok(());
        }
        // Distinguish a poisoned lock from a duplicate.
        if self.lock().is_none() {
            return Err(UserPersistenceError::query(POISONED));
        }
        Err(UserPersistenceError::duplicate_username(
            user.username().as_ref(),
        ))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let tables = self
            .lock()
            .ok_or_else(|| UserPersistenceError::query(POISONED))?;
        Ok(tables.users.get(id).map(|stored| stored.user.clone()))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let tables = self
            .lock()
            .ok_or_else(|| UserPersistenceError::query(POISONED))?;
        Ok(tables
            .users
            .values()
            .find(|stored| stored.user.username().as_ref() == username)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let tables = self
            .lock()
            .ok_or_else(|| UserPersistenceError::query(POISONED))?;
        let mut users: Vec<User> = tables
            .users
            .values()
            .map(|stored| stored.user.clone())
            .collect();
        users.sort_by(|a, b| a.username().as_ref().cmp(b.username().as_ref()));
        Ok(users)
    }
}

#[async_trait]
impl ItemRepository for InMemoryMarketplace {
    async fn insert(&self, item: &Item) -> Result<(), ItemRepositoryError> {
        let mut tables = self
            .lock()
            .ok_or_else(|| ItemRepositoryError::query(POISONED))?;
        if tables.item(&item.id).is_some() {
            return Err(ItemRepositoryError::query(format!(
                "item {} already exists",
                item.id
            )));
        }
        tables.items.push(item.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ItemId) -> Result<Option<Item>, ItemRepositoryError> {
        let tables = self
            .lock()
            .ok_or_else(|| ItemRepositoryError::query(POISONED))?;
        Ok(tables.item(id).cloned())
    }

    async fn list(&self, filter: &ItemListFilter) -> Result<Vec<Item>, ItemRepositoryError> {
        let tables = self
            .lock()
            .ok_or_else(|| ItemRepositoryError::query(POISONED))?;
        Ok(tables
            .items
            .iter()
            .rev()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect())
    }

    async fn update(&self, item: &Item, expected_revision: u32) -> Result<(), ItemRepositoryError> {
        let mut tables = self
            .lock()
            .ok_or_else(|| ItemRepositoryError::query(POISONED))?;
        let Some(index) = tables.item_index(&item.id) else {
            return Err(ItemRepositoryError::missing(item.id.to_string()));
        };
        let actual = tables.items[index].revision;
        if actual != expected_revision {
            return Err(ItemRepositoryError::revision_mismatch(
                expected_revision,
                actual,
            ));
        }
        tables.items[index] = item.clone();
        Ok(())
    }

    async fn delete(&self, id: &ItemId) -> Result<bool, ItemRepositoryError> {
        let mut tables = self
            .lock()
            .ok_or_else(|| ItemRepositoryError::query(POISONED))?;
        let Some(index) = tables.item_index(id) else {
            return Ok(false);
        };
        tables.items.remove(index);
        tables.offers.retain(|offer| {
            offer.item_desired != *id && offer.terms.item_offered() != Some(*id)
        });
        Ok(true)
    }
}

#[async_trait]
impl OfferRepository for InMemoryMarketplace {
    async fn insert(&self, offer: &Offer) -> Result<(), OfferRepositoryError> {
        let mut tables = self
            .lock()
            .ok_or_else(|| OfferRepositoryError::query(POISONED))?;
        if tables.offer_index(&offer.id).is_some() {
            return Err(OfferRepositoryError::query(format!(
                "offer {} already exists",
                offer.id
            )));
        }
        tables.offers.push(offer.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &OfferId) -> Result<Option<Offer>, OfferRepositoryError> {
        let tables = self
            .lock()
            .ok_or_else(|| OfferRepositoryError::query(POISONED))?;
        Ok(tables
            .offer_index(id)
            .map(|index| tables.offers[index].clone()))
    }

    async fn list(&self, scope: &OfferScope) -> Result<Vec<Offer>, OfferRepositoryError> {
        let tables = self
            .lock()
            .ok_or_else(|| OfferRepositoryError::query(POISONED))?;
        Ok(tables
            .offers
            .iter()
            .rev()
            .filter(|offer| tables.offer_in_scope(offer, scope))
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        offer: &Offer,
        expected_revision: u32,
    ) -> Result<(), OfferRepositoryError> {
        let mut tables = self
            .lock()
            .ok_or_else(|| OfferRepositoryError::query(POISONED))?;
        match tables.offer_index(&offer.id) {
            Some(index) if tables.offers[index].revision == expected_revision => {
                tables.offers[index] = offer.clone();
                Ok(())
            }
            _ => Err(OfferRepositoryError::conflict(format!(
                "offer {} changed since revision {expected_revision}",
                offer.id
            ))),
        }
    }

    async fn delete(&self, id: &OfferId) -> Result<bool, OfferRepositoryError> {
        let mut tables = self
            .lock()
            .ok_or_else(|| OfferRepositoryError::query(POISONED))?;
        let before = tables.offers.len();
        tables.offers.retain(|offer| offer.id != *id);
        Ok(tables.offers.len() < before)
    }

    async fn settle(&self, settlement: &OfferSettlement) -> Result<(), OfferRepositoryError> {
        let mut tables = self
            .lock()
            .ok_or_else(|| OfferRepositoryError::query(POISONED))?;

        let offer_index = tables
            .offer_index(&settlement.offer.id)
            .filter(|index| tables.offers[*index].revision == settlement.expected_offer_revision)
            .ok_or_else(|| {
                OfferRepositoryError::conflict(format!(
                    "offer {} was modified concurrently",
                    settlement.offer.id
                ))
            })?;

        let mut item_indexes = Vec::with_capacity(settlement.items.len());
        for transition in &settlement.items {
            let index = tables
                .item_index(&transition.item.id)
                .filter(|index| tables.items[*index].revision == transition.expected_revision)
                .ok_or_else(|| {
                    OfferRepositoryError::conflict(format!(
                        "item {} was modified concurrently",
                        transition.item.id
                    ))
                })?;
            item_indexes.push(index);
        }

        tables.offers[offer_index] = settlement.offer.clone();
        for (index, transition) in item_indexes.into_iter().zip(&settlement.items) {
            tables.items[index] = transition.item.clone();
        }
        Ok(())
    }
}
