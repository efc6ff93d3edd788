use anyhow::Result;
use async_trait::async_trait;

use crate::model::{Asset, OptionChain};

// ── Provider results ────────────────────────────────────────────────

/// Both sides of one asset's chain for the next weekly expiry.
#[derive(Debug, Clone, Default)]
pub struct AssetChains {
    pub spot: f64,
    pub calls: OptionChain,
    pub puts: OptionChain,
}

/// Daily close.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    /// Unix seconds.
    pub timestamp: u64,
    pub price: f64,
}

// ── Provider traits ─────────────────────────────────────────────────

/// Source of listed option chains.
#[async_trait]
pub trait OptionsProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fetch the weekly chains for a listed asset.
    async fn fetch_chains(&self, asset: Asset) -> Result<AssetChains>;
}

/// Source of spot prices and daily price history.
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Daily closes for the last `days` days, oldest first.
    async fn fetch_prices(&self, asset: Asset, days: u32) -> Result<Vec<PricePoint>>;

    /// Current USD price.
    async fn fetch_spot(&self, asset: Asset) -> Result<f64>;
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Retry an async operation with exponential backoff.
pub async fn retry<T, F, Fut>(max_retries: u32, f: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match f().await {
            Ok(val) => return Ok(val),
            Err(e) if attempt >= max_retries => return Err(e),
            Err(_) => {
                let delay = std::time::Duration::from_millis(1000 * 2u64.pow(attempt));
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[tokio::test]
    async fn test_retry_gives_up_after_max() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = retry(0, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { anyhow::bail!("down") }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retry_returns_first_success() {
        let calls = AtomicU32::new(0);
        let result = retry(3, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(7) }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
