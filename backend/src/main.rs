//! Helpdesk entry-point: loads configuration, prepares storage, and serves the
//! REST API with health probes and OpenAPI docs.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use helpdesk::domain::RegistrationPolicy;
use helpdesk::inbound::http::auth_config::{BuildMode, auth_settings_from_env};
use helpdesk::inbound::http::health::HealthState;
use helpdesk::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use helpdesk::settings::ServerSettings;

use server::{ServerConfig, create_server};

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

    let settings = ServerSettings::load().wrap_err("failed to load server settings")?;
    let mode = BuildMode::from_debug_assertions();
    let auth = auth_settings_from_env(&DefaultEnv::new(), mode)
        .wrap_err("invalid credential configuration")?;

    let mut config = ServerConfig::new(
        auth,
        settings.bind_addr(),
        settings.cors_origin(),
        settings.upload_dir(),
    );
    if settings.open_admin_signup {
        warn!("public registration may create admin accounts");
        config = config.with_registration_policy(RegistrationPolicy::AnyRole);
    }

    match settings.database_url() {
        Some(url) => {
            let owned = url.to_owned();
            let applied = web::block(move || run_pending_migrations(&owned))
                .await
                .wrap_err("migration task failed")?
                .wrap_err("failed to migrate database")?;
            info!(applied, "database migrations complete");
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .wrap_err("failed to build database pool")?;
            config = config.with_db_pool(pool);
        }
        None if mode == BuildMode::Release && !settings.allow_in_memory => {
            return Err(eyre!(
                "HELPDESK_DATABASE_URL is required in release builds \
                 (set HELPDESK_ALLOW_IN_MEMORY=true to override)"
            ));
        }
        None => {}
    }

    let health_state = web::Data::new(HealthState::new());
    info!(addr = %settings.bind_addr(), "starting helpdesk server");
    let server = create_server(health_state, config).wrap_err("failed to start server")?;
    server.await.wrap_err("server terminated with an error")
}
