//! HTTP server configuration object and helpers.

use actix_web::cookie::{Key, SameSite};
use barter_backend::outbound::media::DEFAULT_MEDIA_BASE;
use barter_backend::outbound::persistence::DbPool;
use std::net::SocketAddr;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) media_base_url: String,
}

impl ServerConfig {
    /// Construct a server configuration backed by the in-memory store.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            media_base_url: DEFAULT_MEDIA_BASE.to_owned(),
        }
    }

    /// Attach a database connection pool. Repositories switch to Diesel.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Prefix used to turn stored media references into URLs.
    #[must_use]
    pub fn with_media_base_url(mut self, base: impl Into<String>) -> Self {
        self.media_base_url = base.into();
        self
    }
}
