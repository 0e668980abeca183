use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::llm_client::DEFAULT_MODEL;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;
const MIN_SESSION_SECRET_LEN: usize = 16;

/// Application configuration loaded from environment variables.
/// Fails at startup if the session secret is missing; a missing AI key only
/// disables the AI step.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: Option<String>,
    pub gemini_model: String,
    pub ai_timeout_secs: u64,
    pub session_secret: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process environment.
    pub fn from_source(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let session_secret = non_empty("SESSION_SECRET")
            .with_context(|| "Required environment variable 'SESSION_SECRET' is not set")?;
        if session_secret.len() < MIN_SESSION_SECRET_LEN {
            bail!("SESSION_SECRET must be at least {MIN_SESSION_SECRET_LEN} bytes long");
        }

        Ok(Config {
            google_api_key: non_empty("GOOGLE_API_KEY"),
            gemini_model: non_empty("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            ai_timeout_secs: non_empty("AI_TIMEOUT_SECS")
                .unwrap_or_else(|| "120".to_string())
                .parse::<u64>()
                .context("AI_TIMEOUT_SECS must be a whole number of seconds")?,
            session_secret,
            upload_dir: PathBuf::from(
                non_empty("UPLOAD_FOLDER").unwrap_or_else(|| "uploads".to_string()),
            ),
            max_upload_bytes: match non_empty("MAX_CONTENT_LENGTH") {
                Some(v) => v
                    .parse::<usize>()
                    .context("MAX_CONTENT_LENGTH must be a size in bytes")?,
                None => DEFAULT_MAX_UPLOAD_BYTES,
            },
            port: non_empty("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: non_empty("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Upload limit in whole MiB, as shown to users.
    pub fn max_upload_mb(&self) -> usize {
        (self.max_upload_bytes + (1024 * 1024) / 2) / (1024 * 1024)
    }
}
