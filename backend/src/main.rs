//! Backend entry-point: loads configuration, prepares storage, and serves the
//! pair interaction API.

mod server;

use std::time::Duration;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use pairspace::inbound::http::health::HealthState;
use pairspace::inbound::http::session_config::{BuildMode, session_settings_from_env};
use pairspace::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations_async};
use pairspace::outbound::push::WebPushConfig;
use pairspace::settings::Settings;

use server::{InteractionOptions, ServerConfig, create_server};

const WORKER_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = Settings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load configuration: {e}")))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let interactions = interaction_options(&settings)?;

    let mut config = ServerConfig::new(session, bind_addr, interactions);
    if let Some(database_url) = settings.database_url() {
        config = config.with_db_pool(prepare_database(database_url, &settings).await?);
    }

    let health_state = web::Data::new(HealthState::new());
    let (server, worker) = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "listening");
    let outcome = server.await;

    health_state.mark_unhealthy();
    match tokio::time::timeout(WORKER_DRAIN_TIMEOUT, worker).await {
        Ok(Ok(())) => info!("notification worker drained"),
        Ok(Err(error)) => warn!(%error, "notification worker failed"),
        Err(_) => warn!("notification worker still busy at shutdown"),
    }
    outcome
}

fn interaction_options(settings: &Settings) -> std::io::Result<InteractionOptions> {
    let ledger_policy = settings.ledger_policy().map_err(std::io::Error::other)?;
    let push = settings.vapid_private_key().map(|key| {
        WebPushConfig::new(key, settings.vapid_subject())
            .with_ttl_seconds(settings.push_ttl_seconds())
            .with_timeout(settings.push_timeout())
    });
    Ok(InteractionOptions::new(settings.notice_rules(), ledger_policy)
        .with_push(push)
        .with_cron_secret(settings.cron_secret())
        .with_composer_seed(settings.composer_seed)
        .with_dispatch_concurrency(settings.dispatch_concurrency()))
}

async fn prepare_database(database_url: &str, settings: &Settings) -> std::io::Result<DbPool> {
    let applied = run_pending_migrations_async(database_url.to_owned())
        .await
        .map_err(std::io::Error::other)?;
    info!(applied, "database schema up to date");
    DbPool::new(PoolConfig::new(database_url).with_max_size(settings.db_max_connections()))
        .await
        .map_err(std::io::Error::other)
}
