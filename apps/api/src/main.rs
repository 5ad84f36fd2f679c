mod config;
mod db;
mod errors;
mod extract;
mod identity;
mod models;
mod receipts;
mod recognizer;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, PageConfig};
use crate::db::{create_pool, init_schema};
use crate::extract::{ExtractorConfig, ReceiptExtractor};
use crate::receipts::store::PgReceiptStore;
use crate::recognizer::HttpRecognizer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting recibos API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL and the receipts table
    let pool = create_pool(&config.database_url).await?;
    init_schema(&pool).await?;
    let store = Arc::new(PgReceiptStore::new(pool));

    // Initialize the recognizer client
    let recognizer = Arc::new(HttpRecognizer::new(config.ocr_url.clone()));
    info!(
        "Recognizer client initialized (endpoint: {}, language: {})",
        config.ocr_url, config.ocr_language
    );

    // Extraction engine with its documented heuristics
    let extractor = ReceiptExtractor::new(ExtractorConfig::default());

    // Build app state
    let state = AppState {
        store,
        recognizer,
        extractor,
        http: reqwest::Client::new(),
        config: config.clone(),
        pages: PageConfig::default(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
