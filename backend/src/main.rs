//! Main entry point for the Colada Finder backend.
//!
//! This file loads configuration, initializes logging, opens the database and
//! serves the Axum router until a shutdown signal arrives.

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use backend::auth::JwtValidator;
use backend::config::Config;
use backend::database::Database;
use backend::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let config = Config::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    format!("backend={0},storage={0},tower_http={0}", config.log_level).into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }
    let policy = config.policy()?;

    info!("Listen: {}", config.listen);
    info!(
        "Verification policy: min {} votes, min {:.0}% yes",
        policy.min_samples(),
        policy.min_ratio() * 100.0
    );

    let db = Database::connect(&config).await;
    let jwt = JwtValidator::new(&config.jwt_secret, config.jwt_expiry_seconds);
    let app = app(AppState::new(db, jwt, policy));

    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("failed to bind {}", config.listen))?;
    info!("listening on {}", config.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
