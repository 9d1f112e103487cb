//! Cyberfort Core - URL and phone number safety checks
//!
//! This service checks URLs against VirusTotal and phone numbers against
//! AbstractAPI, falls back to local heuristics when those are unavailable,
//! and keeps a history of every verdict.

use std::sync::Arc;

use tokio::net::TcpListener;

mod api;
mod config;
mod domain;
mod engine;
mod error;
mod logging;
mod storage;

use crate::api::build_router;
use crate::config::Config;
use crate::engine::{RandomSource, SeededRandom, ThreadRandom, VerdictEngine};
use crate::storage::CheckRepository;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Produces URL and phone verdicts.
    pub engine: Arc<VerdictEngine>,
    /// Check history.
    pub repository: CheckRepository,
    /// Number of records returned with each check and by the history endpoints.
    pub history_limit: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: No .env file loaded ({e})");
    }

    // Initialize logging
    logging::init();

    tracing::info!("Starting Cyberfort Core v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        database = %config.database.url,
        heuristic_fallback = config.reputation.heuristic_fallback,
        "Configuration loaded"
    );

    // Connect to database
    let pool = CheckRepository::connect(&config.database.url, config.database.max_connections)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to database");
            anyhow::anyhow!("Database connection error: {}", e)
        })?;

    // Initialize repository and schema
    let repository = CheckRepository::new(pool);
    repository.init_schema().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to initialize database schema");
        anyhow::anyhow!("Schema initialization error: {}", e)
    })?;

    tracing::info!("Database connected and schema initialized");

    // Build the verdict engine
    let random: Box<dyn RandomSource> = match config.reputation.heuristic_seed {
        Some(seed) => {
            tracing::info!(seed, "Phone heuristics use a fixed seed");
            Box::new(SeededRandom::new(seed))
        }
        None => Box::new(ThreadRandom),
    };
    let engine = VerdictEngine::from_config(&config.reputation, random)
        .map_err(|e| anyhow::anyhow!("Verdict engine error: {}", e))?;

    if engine.url_reputation_enabled() {
        tracing::info!("VirusTotal URL reputation enabled");
    } else {
        tracing::warn!("VirusTotal API key not set - URL checks use local heuristics");
    }
    if engine.phone_validation_enabled() {
        tracing::info!("AbstractAPI phone validation enabled");
    } else {
        tracing::warn!("AbstractAPI API key not set - phone checks use local heuristics");
    }

    let state = AppState {
        engine: Arc::new(engine),
        repository,
        history_limit: config.history.limit,
    };

    // Build router
    let app = build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(address = %addr, "Server listening");
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
