use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub ocr_url: String,
    pub ocr_language: String,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            ocr_url: require_env("OCR_URL")?,
            ocr_language: std::env::var("OCR_LANGUAGE").unwrap_or_else(|_| "spa".to_string()),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| (10 * 1024 * 1024).to_string())
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Pagination bounds for the listing endpoint. Constructed once at startup
/// and carried in `AppState` rather than read from ambient globals.
#[derive(Debug, Clone, Copy)]
pub struct PageConfig {
    pub default_limit: i64,
    pub max_limit: i64,
}

impl Default for PageConfig {
    fn default() -> Self {
        PageConfig {
            default_limit: 20,
            max_limit: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_config_defaults() {
        let cfg = PageConfig::default();
        assert_eq!(cfg.default_limit, 20);
        assert_eq!(cfg.max_limit, 100);
    }
}
