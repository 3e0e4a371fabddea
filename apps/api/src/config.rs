use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every value has a default; only malformed numbers fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// One JSON file per profile lives here.
    pub profiles_dir: PathBuf,
    /// Stored credential and resume history.
    pub data_dir: PathBuf,
    /// Takes precedence over the stored credential when set.
    pub anthropic_api_key: Option<String>,
    pub llm_timeout: Duration,
    pub generation_concurrency: usize,
    pub history_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            profiles_dir: path_env("PROFILES_DIR", "profiles"),
            data_dir: path_env("DATA_DIR", "data"),
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            llm_timeout: Duration::from_secs(parse_env("LLM_TIMEOUT_SECS", 120)?),
            generation_concurrency: parse_env::<usize>("GENERATION_CONCURRENCY", 4)?.max(1),
            history_limit: parse_env("HISTORY_LIMIT", 20)?,
        })
    }

    pub fn credential_path(&self) -> PathBuf {
        self.data_dir.join("api_config.json")
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join("resume_history.json")
    }
}

fn path_env(key: &str, default: &str) -> PathBuf {
    PathBuf::from(std::env::var(key).unwrap_or_else(|_| default.to_string()))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
