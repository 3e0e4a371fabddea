mod cli;
mod config;
mod credentials;
mod errors;
mod export;
mod generation;
mod llm_client;
mod profiles;
mod routes;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::credentials::CredentialStore;
use crate::generation::history::HistoryLog;
use crate::llm_client::LlmClient;
use crate::profiles::ProfileStore;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::ensure_dir;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (fails on malformed numeric env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Generate(args) => cli::run_generate(&config, args).await,
    }
}

async fn serve(config: Config) -> Result<()> {
    info!("Starting tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Storage directories
    ensure_dir(&config.profiles_dir).await?;
    ensure_dir(&config.data_dir).await?;
    let profiles = ProfileStore::new(&config.profiles_dir);
    info!("Profile store at {}", config.profiles_dir.display());

    // Credential store (environment key wins over the stored one)
    let credentials = Arc::new(
        CredentialStore::open(config.credential_path(), config.anthropic_api_key.clone()).await,
    );
    info!(
        "LLM credential configured: {}",
        credentials.status().await.configured
    );

    // Resume history
    let history = Arc::new(HistoryLog::open(config.history_path(), config.history_limit).await);

    // Initialize LLM client
    let llm = Arc::new(LlmClient::new().context("Failed to build HTTP client")?);
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Build app state
    let state = AppState {
        profiles,
        credentials,
        history,
        llm,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
