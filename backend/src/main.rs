//! Backend entry-point: loads settings, prepares the stores and serves the
//! action API, health probes and (in debug builds) OpenAPI docs.

mod server;

use std::net::SocketAddr;

use actix_web::cookie::SameSite;
use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::outbound::memory::{InMemoryStores, seed_demo};
use server::{AppSettings, BuildMode, ServerConfig, create_server, key_fingerprint, load_session_key};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let bind_addr: SocketAddr = settings
        .bind_addr()
        .parse()
        .wrap_err_with(|| format!("invalid bind address {}", settings.bind_addr()))?;

    let key = load_session_key(
        settings.session_key_file(),
        BuildMode::from_debug_assertions(),
        settings.allow_ephemeral_key,
    )?;
    info!(fingerprint = %key_fingerprint(&key), "session key loaded");

    let stores = InMemoryStores::new();
    if settings.seed_demo {
        seed_demo(
            stores.users.as_ref(),
            stores.teams.as_ref(),
            stores.catalog.as_ref(),
            settings.demo_password(),
        )
        .await
        .wrap_err("failed to seed demo data")?;
    }

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(key, settings.cookie_secure(), SameSite::Lax, bind_addr)
        .with_stores(stores);
    let server = create_server(health_state, config).wrap_err("failed to start server")?;
    info!(%bind_addr, "listening");
    server.await.wrap_err("server terminated with an error")
}
