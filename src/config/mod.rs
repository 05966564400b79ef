//! Environment-driven configuration, validated fail-fast at startup.

use std::time::Duration;

use crate::error::{Result, TunesmithError};
use crate::song::SongClient;
use crate::vision::DescriptionProvider;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Configuration for the bot core.
///
/// Required: `OPENAI_API_KEY`, `SUNO_API_URL`. Optional: `OPENAI_BASE_URL`,
/// `VISION_MODEL`, `MAX_RETRIES` (default 3), `TIMEOUT` (seconds,
/// default 300).
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub openai_api_key: String,
    pub suno_api_url: String,
    pub openai_base_url: Option<String>,
    pub vision_model: Option<String>,
    pub max_retries: u32,
    pub timeout: Duration,
}

impl BotConfig {
    /// Load from the process environment (reading `.env` first if present).
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    ///
    /// All missing required variables are reported in a single
    /// [`TunesmithError::Configuration`] error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let openai_api_key = lookup("OPENAI_API_KEY").filter(|v| !v.is_empty());
        let suno_api_url = lookup("SUNO_API_URL").filter(|v| !v.is_empty());

        let (openai_api_key, suno_api_url) = match (openai_api_key, suno_api_url) {
            (Some(key), Some(url)) => (key, url),
            (key, url) => {
                let mut missing = Vec::new();
                if key.is_none() {
                    missing.push("OPENAI_API_KEY");
                }
                if url.is_none() {
                    missing.push("SUNO_API_URL");
                }
                return Err(TunesmithError::Configuration(format!(
                    "Missing required environment variables: {}",
                    missing.join(", ")
                )));
            }
        };

        let max_retries = parse_var(&lookup, "MAX_RETRIES", DEFAULT_MAX_RETRIES)?;
        let timeout_secs = parse_var(&lookup, "TIMEOUT", DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            openai_api_key,
            suno_api_url,
            openai_base_url: lookup("OPENAI_BASE_URL"),
            vision_model: lookup("VISION_MODEL"),
            max_retries,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Build a vision client from this configuration.
    pub fn description_provider(&self) -> DescriptionProvider {
        let provider =
            DescriptionProvider::new(self.openai_api_key.clone(), self.openai_base_url.clone());
        match &self.vision_model {
            Some(model) => provider.with_model(model),
            None => provider,
        }
    }

    /// Build a song client from this configuration.
    pub fn song_client(&self) -> SongClient {
        SongClient::new(self.suno_api_url.clone())
            .with_max_retries(self.max_retries)
            .with_timeout(self.timeout)
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw.parse().map_err(|e| {
            TunesmithError::Configuration(format!("Invalid value for {name}: {e}"))
        }),
        None => Ok(default),
    }
}
