use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::ranking_client::polling::DEFAULT_POLL_INTERVAL;
use crate::ranking_client::ClientConfig;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client configuration loaded from environment variables (and `.env`).
/// Every value has a default; malformed values are startup errors.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_url = lookup("RANKER_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        reqwest::Url::parse(&api_url)
            .with_context(|| format!("RANKER_API_URL '{api_url}' is not a valid URL"))?;

        let poll_interval_ms = parse_or(
            &lookup,
            "RANKER_POLL_INTERVAL_MS",
            DEFAULT_POLL_INTERVAL.as_millis() as u64,
        )?;
        if poll_interval_ms == 0 {
            bail!("RANKER_POLL_INTERVAL_MS must be greater than zero");
        }

        Ok(Config {
            api_url,
            poll_interval: Duration::from_millis(poll_interval_ms),
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "RANKER_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_url.clone(),
            request_timeout: self.request_timeout,
        }
    }
}

fn parse_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> Result<u64> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("{key} must be a whole number, got '{raw}'")),
        None => Ok(default),
    }
}
