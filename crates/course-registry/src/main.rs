//! Course Registry - course catalog and registration backend

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use config::{Config, ConfigOverrides, LoggingConfig};
use course_api::{AppState, create_router};
use course_auth::{Argon2Hasher, CredentialHasher, TokenCodec};
use course_db::{Database, NewUser, UserRole};

/// Course Registry - course catalog and registration backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "COURSE_REGISTRY_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "COURSE_REGISTRY_PORT")]
    port: Option<u16>,

    /// Token signing secret
    #[arg(long, env = "SECRET_KEY", hide_env_values = true)]
    secret_key: Option<String>,

    /// Token signing algorithm (HS256, HS384 or HS512)
    #[arg(long, env = "ALGORITHM")]
    algorithm: Option<String>,

    /// Access token lifetime in minutes
    #[arg(long, env = "ACCESS_TOKEN_EXPIRE_MINUTES")]
    token_ttl_minutes: Option<i64>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            bind: self.bind.clone(),
            port: self.port,
            secret_key: self.secret_key.clone(),
            algorithm: self.algorithm.clone(),
            token_ttl_minutes: self.token_ttl_minutes,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // A .env file may hold SECRET_KEY and friends
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut config = Config::load(&args.config)?;
    config.apply_overrides(args.overrides());

    init_logging(&config.logging);

    info!("Starting Course Registry v{}", env!("CARGO_PKG_VERSION"));

    // Signing configuration is mandatory
    let token_config = config.token_config()?;
    info!(
        "Token signing: {:?}, default ttl {} minutes",
        token_config.algorithm(),
        token_config.default_ttl().num_minutes()
    );

    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install metrics recorder")?;

    if let Some(parent) = Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let db = Database::new(&config.database_url()).await?;

    let hasher = Arc::new(Argon2Hasher::new()?);
    bootstrap_admin(&config, &db, hasher.as_ref()).await?;

    let tokens = Arc::new(TokenCodec::new(&token_config));
    let state = AppState::new(db, tokens, hasher);

    let app = create_router(state, Some(Arc::new(metrics_handle))).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.server.bind_address, config.server.port)
        .parse()
        .context("Invalid bind address")?;

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Create the configured administrator if the user table is empty
async fn bootstrap_admin(config: &Config, db: &Database, hasher: &dyn CredentialHasher) -> Result<()> {
    let Some(admin) = &config.auth.bootstrap_admin else {
        return Ok(());
    };
    if db.has_users().await? {
        return Ok(());
    }

    info!("Creating bootstrap admin user {}", admin.email);
    let password_hash = hasher.hash(&admin.password)?;
    db.insert_user(NewUser {
        name: admin.name.clone(),
        email: admin.email.clone(),
        password_hash,
        role: UserRole::Admin,
    })
    .await?;
    Ok(())
}

/// Initialize logging
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
