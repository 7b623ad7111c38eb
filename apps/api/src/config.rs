use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables once at
/// startup and injected into components — never re-read from handlers.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Base64-encoded 32-byte key for the encrypted profile store.
    pub encryption_key: String,
    pub profile_path: PathBuf,
    /// Jobs dispatched concurrently per batch during bulk analysis.
    pub batch_size: usize,
    /// Pause between bulk-analysis batches, in seconds.
    pub batch_pause_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            encryption_key: require_env("ENCRYPTION_KEY")?,
            profile_path: std::env::var("PROFILE_STORE_PATH")
                .unwrap_or_else(|_| "data/user_profile.json.enc".to_string())
                .into(),
            batch_size: std::env::var("BULK_BATCH_SIZE")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<usize>()
                .context("BULK_BATCH_SIZE must be a positive integer")?,
            batch_pause_secs: std::env::var("BULK_BATCH_PAUSE_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse::<u64>()
                .context("BULK_BATCH_PAUSE_SECS must be a number of seconds")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
