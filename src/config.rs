use std::time::Duration;

use anyhow::{Context, Result, bail};

pub const DEFAULT_DERIBIT_URL: &str = "https://www.deribit.com/api/v2";
pub const DEFAULT_COINGECKO_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_POLL_SECS: u64 = 10;
pub const DEFAULT_HISTORY_DAYS: u32 = 120;

const HTTP_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("strike-model/", env!("CARGO_PKG_VERSION"));

/// Settings for everything that talks to the outside world.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub deribit_url: String,
    pub coingecko_url: String,
    /// CoinGecko demo key, sent as `x-cg-demo-api-key` when set.
    pub coingecko_key: Option<String>,
    pub history_days: u32,
    pub poll_interval: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            deribit_url: DEFAULT_DERIBIT_URL.to_string(),
            coingecko_url: DEFAULT_COINGECKO_URL.to_string(),
            coingecko_key: None,
            history_days: DEFAULT_HISTORY_DAYS,
            poll_interval: Duration::from_secs(DEFAULT_POLL_SECS),
        }
    }
}

impl FetchSettings {
    /// Resolve CLI values plus `STRIKE_MODEL_*` environment overrides.
    pub fn from_cli(history_days: u32, poll_secs: u64) -> Result<Self> {
        if history_days == 0 {
            bail!("--days must be at least 1");
        }
        if poll_secs == 0 {
            bail!("--interval must be at least 1 second");
        }

        let env = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());

        Ok(FetchSettings {
            deribit_url: env("STRIKE_MODEL_DERIBIT_URL")
                .unwrap_or_else(|| DEFAULT_DERIBIT_URL.to_string()),
            coingecko_url: env("STRIKE_MODEL_COINGECKO_URL")
                .unwrap_or_else(|| DEFAULT_COINGECKO_URL.to_string()),
            coingecko_key: env("STRIKE_MODEL_COINGECKO_KEY"),
            history_days,
            poll_interval: Duration::from_secs(poll_secs),
        })
    }

    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .context("creating HTTP client")
    }
}
