//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use crate::domain::ports::{
    AccountCommand, CredentialHasher, ItemCommand, ItemQuery, ItemRepository, LoginService,
    MediaResolver, OfferCommand, OfferQuery, OfferRepository, UserRepository, UsersQuery,
};
use crate::domain::{AccountService, ItemService, OfferService};
use crate::outbound::memory::InMemoryMarketplace;
use crate::outbound::security::Argon2CredentialHasher;

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
///
/// use barter_backend::inbound::http::state::HttpState;
/// use barter_backend::outbound::media::BaseUrlMediaResolver;
/// use barter_backend::outbound::memory::InMemoryMarketplace;
///
/// let store = Arc::new(InMemoryMarketplace::default());
/// let state = HttpState::in_memory(store, Arc::new(BaseUrlMediaResolver::default()));
/// let _login = state.login.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn AccountCommand>,
    pub users: Arc<dyn UsersQuery>,
    pub items: Arc<dyn ItemCommand>,
    pub items_query: Arc<dyn ItemQuery>,
    pub offers: Arc<dyn OfferCommand>,
    pub offers_query: Arc<dyn OfferQuery>,
    pub media: Arc<dyn MediaResolver>,
}

/// Parameter object grouping the ports behind each resource.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn AccountCommand>,
    pub users: Arc<dyn UsersQuery>,
    pub items: Arc<dyn ItemCommand>,
    pub items_query: Arc<dyn ItemQuery>,
    pub offers: Arc<dyn OfferCommand>,
    pub offers_query: Arc<dyn OfferQuery>,
}

impl HttpState {
    /// Construct state from a ports bundle and a media resolver.
    pub fn new(ports: HttpStatePorts, media: Arc<dyn MediaResolver>) -> Self {
        let HttpStatePorts {
            login,
            accounts,
            users,
            items,
            items_query,
            offers,
            offers_query,
        } = ports;
        Self {
            login,
            accounts,
            users,
            items,
            items_query,
            offers,
            offers_query,
            media,
        }
    }

    /// Wire the domain services over one set of repositories.
    ///
    /// The same repository may back several ports, as the in-memory store does.
    pub fn from_repositories<U, I, O>(
        repositories: Repositories<U, I, O>,
        hasher: Arc<dyn CredentialHasher>,
        media: Arc<dyn MediaResolver>,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        U: UserRepository + 'static,
        I: ItemRepository + 'static,
        O: OfferRepository + 'static,
    {
        let Repositories {
            users,
            items,
            offers,
        } = repositories;
        let account_service = Arc::new(AccountService::new(users, hasher));
        let item_service = Arc::new(ItemService::new(Arc::clone(&items), Arc::clone(&clock)));
        let offer_service = Arc::new(OfferService::new(offers, items, clock));
        Self::new(
            HttpStatePorts {
                login: account_service.clone(),
                accounts: account_service.clone(),
                users: account_service,
                items: item_service.clone(),
                items_query: item_service,
                offers: offer_service.clone(),
                offers_query: offer_service,
            },
            media,
        )
    }

    /// Wire the domain services over the in-process store with the Argon2
    /// hasher and the system clock.
    pub fn in_memory(store: Arc<InMemoryMarketplace>, media: Arc<dyn MediaResolver>) -> Self {
        Self::from_repositories(
            Repositories {
                users: Arc::clone(&store),
                items: Arc::clone(&store),
                offers: store,
            },
            Arc::new(Argon2CredentialHasher::new()),
            media,
            Arc::new(DefaultClock),
        )
    }
}

/// Repositories backing the domain services.
pub struct Repositories<U, I, O> {
    pub users: Arc<U>,
    pub items: Arc<I>,
    pub offers: Arc<O>,
}
