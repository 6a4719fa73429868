//! Backend entry-point: loads settings, prepares persistence and serves the
//! marketplace REST API.

mod server;

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use barter_backend::inbound::http::health::HealthState;
use barter_backend::inbound::http::session_config::{BuildMode, session_settings};
use barter_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use barter_backend::settings::AppSettings;

use server::{ServerConfig, create_server};

/// Apply migrations on a blocking thread, then open the async pool.
async fn prepare_database(pool_config: PoolConfig) -> io::Result<DbPool> {
    let url = pool_config.database_url().to_owned();
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
        .await
        .map_err(|err| io::Error::other(format!("migration task failed: {err}")))?
        .map_err(io::Error::other)?;
    info!(applied, "database schema up to date");

    DbPool::new(pool_config)
        .await
        .map_err(|err| io::Error::other(err.into_message()))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| io::Error::other(err.to_string()))?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
    let session = session_settings(
        &settings.session_toggles(),
        BuildMode::from_debug_assertions(),
    )
    .map_err(io::Error::other)?;

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    )
    .with_media_base_url(settings.media_base_url());
    if let Some(pool_config) = settings.pool_config() {
        config = config.with_db_pool(prepare_database(pool_config).await?);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "listening");
    let outcome = server.await;
    health_state.mark_unhealthy();
    outcome
}
