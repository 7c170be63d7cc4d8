//! Values server entry-point: loads settings, prepares storage and runs the
//! HTTP server.

mod server;

use std::io;
use std::sync::Arc;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use values_app::inbound::http::health::HealthState;
use values_app::inbound::http::session_config::{BuildMode, session_settings_from_env};
use values_app::inbound::http::views::MiniJinjaViews;
use values_app::outbound::persistence::{DbPool, PoolConfig, auto_migrate, destructive_reset};
use values_app::services::{
    Services, ServicesConfig, with_in_memory_store, with_pool, with_users, with_values,
};
use values_app::settings::AppSettings;

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

    let settings = AppSettings::load().map_err(|e| io::Error::other(e.to_string()))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|e| io::Error::other(e.to_string()))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let storage = storage_step(&settings).await?;
    let services = Services::new(vec![storage, with_values(), with_users()])
        .map_err(|e| io::Error::other(e.to_string()))?;
    if let Some((email, password)) = settings.admin_credentials() {
        services
            .ensure_admin(email, password)
            .await
            .map_err(|e| io::Error::other(e.to_string()))?;
    }

    let views = MiniJinjaViews::new().map_err(|e| io::Error::other(e.to_string()))?;
    let http_state = services.http_state(Arc::new(views));

    let config = ServerConfig::new(session, bind_addr, http_state)
        .with_assets(settings.css_dir(), settings.js_dir());
    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting server");
    let server = create_server(health_state, config)?;
    server.await
}

/// Choose PostgreSQL when a database URL is configured, running the
/// requested migrations first; otherwise fall back to the in-memory store.
async fn storage_step(settings: &AppSettings) -> io::Result<ServicesConfig> {
    let Some(database_url) = settings.database_url.as_deref() else {
        warn!("no database URL configured; values are kept in memory");
        return Ok(with_in_memory_store());
    };

    if settings.destructive_reset {
        warn!("destructive reset requested; reverting every migration");
        destructive_reset(database_url)
            .await
            .map_err(|e| io::Error::other(e.to_string()))?;
    } else if settings.auto_migrate {
        let applied = auto_migrate(database_url)
            .await
            .map_err(|e| io::Error::other(e.to_string()))?;
        info!(applied, "migrations applied");
    }

    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.pool_max_size()))
        .await
        .map_err(|e| io::Error::other(e.to_string()))?;
    Ok(with_pool(pool))
}
