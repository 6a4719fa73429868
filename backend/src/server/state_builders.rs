//! Builders wiring repositories into the shared HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::info;

use barter_backend::domain::ports::MediaResolver;
use barter_backend::inbound::http::state::{HttpState, Repositories};
use barter_backend::outbound::media::BaseUrlMediaResolver;
use barter_backend::outbound::memory::InMemoryMarketplace;
use barter_backend::outbound::persistence::{
    DbPool, DieselItemRepository, DieselOfferRepository, DieselUserRepository,
};
use barter_backend::outbound::security::Argon2CredentialHasher;

use super::ServerConfig;

fn diesel_state(pool: &DbPool, media: Arc<dyn MediaResolver>) -> HttpState {
    HttpState::from_repositories(
        Repositories {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            items: Arc::new(DieselItemRepository::new(pool.clone())),
            offers: Arc::new(DieselOfferRepository::new(pool.clone())),
        },
        Arc::new(Argon2CredentialHasher::new()),
        media,
        Arc::new(DefaultClock),
    )
}

/// Build the shared HTTP state: Diesel repositories when a pool is configured,
/// otherwise a process-local in-memory store.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let media: Arc<dyn MediaResolver> =
        Arc::new(BaseUrlMediaResolver::new(config.media_base_url.as_str()));
    let state = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL repositories");
            diesel_state(pool, media)
        }
        None => {
            info!("no database configured; using in-memory repositories");
            HttpState::in_memory(Arc::new(InMemoryMarketplace::default()), media)
        }
    };
    web::Data::new(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    use actix_web::cookie::{Key, SameSite};
    use barter_backend::domain::{Registration, RegistrationParts};
    use rstest::rstest;

    fn memory_config() -> ServerConfig {
        let addr: SocketAddr = "127.0.0.1:0".parse().expect("socket addr");
        ServerConfig::new(Key::generate(), false, SameSite::Lax, addr)
            .with_media_base_url("https://cdn.example.com/media")
    }

    #[rstest]
    #[tokio::test]
    async fn missing_pool_selects_a_working_in_memory_store() {
        let state = build_http_state(&memory_config());
        let registration = Registration::try_from_parts(RegistrationParts {
            username: "ada",
            email: "ada@example.com",
            display_name: "Ada",
            password: "correct horse battery",
            password_confirmation: "correct horse battery",
        })
        .expect("valid registration");

        let user = state
            .accounts
            .register(&registration)
            .await
            .expect("registration succeeds");
        let found = state
            .users
            .find_user(user.id())
            .await
            .expect("lookup succeeds");
        assert_eq!(found.as_ref().map(|u| u.id()), Some(user.id()));
    }

    #[rstest]
    fn media_base_is_taken_from_config() {
        let state = build_http_state(&memory_config());
        let reference =
            barter_backend::domain::MediaReference::new("lamp.jpg").expect("reference");
        assert_eq!(
            state.media.resolve(&reference),
            "https://cdn.example.com/media/lamp.jpg"
        );
    }
}
