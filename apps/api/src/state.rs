use std::sync::Arc;

use crate::config::{Config, PageConfig};
use crate::extract::ReceiptExtractor;
use crate::receipts::store::ReceiptStore;
use crate::recognizer::Recognizer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Record store behind its trait so handlers never see the pool.
    pub store: Arc<dyn ReceiptStore>,
    /// Image-to-text boundary. Swappable; only the ingestion path calls it.
    pub recognizer: Arc<dyn Recognizer>,
    /// Pure extraction engine, regexes compiled once at startup.
    pub extractor: ReceiptExtractor,
    /// Plain HTTP client for fetching images from pre-signed storage URLs.
    pub http: reqwest::Client,
    pub config: Config,
    pub pages: PageConfig,
}
