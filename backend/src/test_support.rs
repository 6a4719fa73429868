//! Test utilities for the backend crate.
//!
//! Shared by unit tests in `src/` and the HTTP scenario suites in `tests/`.
//! Compiled for tests and when the `test-support` feature is enabled.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use mockable::DefaultClock;

use crate::domain::ports::CredentialHasher;
use crate::domain::{DisplayName, EmailAddress, Roles, User, UserId, Username};
use crate::Trace;
use crate::inbound::http::configure_api;
use crate::inbound::http::state::{HttpState, Repositories};
use crate::outbound::media::BaseUrlMediaResolver;
use crate::outbound::memory::InMemoryMarketplace;
use crate::outbound::security::Argon2CredentialHasher;

/// Password shared by every seeded account.
pub const SEEDED_PASSWORD: &str = "correct horse battery";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// HTTP state over a fresh in-memory store using a low-cost password hasher.
pub fn memory_state() -> (Arc<InMemoryMarketplace>, HttpState) {
    let store = Arc::new(InMemoryMarketplace::default());
    let state = HttpState::from_repositories(
        Repositories {
            users: Arc::clone(&store),
            items: Arc::clone(&store),
            offers: Arc::clone(&store),
        },
        Arc::new(Argon2CredentialHasher::low_cost()),
        Arc::new(BaseUrlMediaResolver::default()),
        Arc::new(DefaultClock),
    );
    (store, state)
}

/// App exposing the full `/api/v1` surface over `state`, wrapped in the
/// trace and test session middleware.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .wrap(Trace)
        .service(web::scope("/api/v1").configure(configure_api))
}

/// Insert an account with [`SEEDED_PASSWORD`] and the given roles.
///
/// Elevated roles cannot be obtained through registration, so admin
/// scenarios seed their actors here.
///
/// # Panics
/// Panics when the username is invalid or already taken.
pub fn seed_account(store: &InMemoryMarketplace, username: &str, roles: Roles) -> User {
    let user = User::new(
        UserId::random(),
        Username::new(username).expect("valid seeded username"),
        EmailAddress::new(format!("{username}@example.com")).expect("valid seeded email"),
        DisplayName::new(username).expect("valid seeded display name"),
        roles,
    );
    let digest = Argon2CredentialHasher::low_cost()
        .hash(SEEDED_PASSWORD)
        .expect("hash seeded password");
    assert!(
        store.seed_user(user.clone(), digest),
        "seeded username {username} already taken"
    );
    user
}
