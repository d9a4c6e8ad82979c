// This is the entry point of the StatIQ backend.
//
// **Architecture Overview:**
// - `core/` = Business logic (no HTTP, no SQL)
// - `infra/` = Implementations of core traits (SQLite stores)
// - `api/` = HTTP adapters (axum routers, extractors, error mapping)
// - `cli/` = Operator commands (score import, score update, dedupe, email)
//
// This file's job is to:
// 1. Load configuration
// 2. Open and migrate the database
// 3. Either serve the API or run one operator command

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "api/api_layer.rs"]
mod api;
#[path = "cli/cli_layer.rs"]
mod cli;
mod config;
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::api::AppState;
use crate::cli::{Cli, Command};
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Parser;
use sqlx::{Pool, Sqlite};
use tracing_subscriber::EnvFilter;

async fn serve(config: &Config, pool: Pool<Sqlite>) -> Result<()> {
    let jwt_secret = config.require_jwt_secret()?;
    let state = AppState::new(
        pool,
        jwt_secret,
        config.token_ttl_minutes,
        config.moderation.clone(),
        config.email.clone(),
    );
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!("🚀 StatIQ API listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutting down");
        })
        .await
        .context("Server error")
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("statiq_backend=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let pool = infra::database::connect(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;
    infra::database::migrate(&pool)
        .await
        .context("Failed to migrate database")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&config, pool).await,
        command => {
            let report = cli::run(command, pool, &config.email).await?;
            print!("{}", report);
            Ok(())
        }
    }
}
