use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::fetch_data::types::{PriceHistoryProvider, PricePoint, retry};
use crate::model::Asset;

const API_KEY_HEADER: &str = "x-cg-demo-api-key";

// ── API response types ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct MarketChart {
    /// `[ms, price]` pairs.
    prices: Vec<(f64, f64)>,
}

type SimplePrice = HashMap<String, HashMap<String, f64>>;

// ── Provider ─────────────────────────────────────────────────────────

/// Daily USD closes and spot prices from CoinGecko.
pub struct CoinGeckoProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl CoinGeckoProvider {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        retry(3, || {
            let mut request = self.client.get(&url).query(query);
            if let Some(key) = &self.api_key {
                request = request.header(API_KEY_HEADER, key);
            }
            async move {
                let r = request.send().await?.error_for_status()?.json::<T>().await?;
                Ok(r)
            }
        })
        .await
        .with_context(|| format!("calling CoinGecko {path}"))
    }
}

#[async_trait]
impl PriceHistoryProvider for CoinGeckoProvider {
    fn name(&self) -> &'static str {
        "coingecko"
    }

    async fn fetch_prices(&self, asset: Asset, days: u32) -> Result<Vec<PricePoint>> {
        let chart: MarketChart = self
            .get(
                &format!("coins/{}/market_chart", asset.coingecko_id()),
                &[
                    ("vs_currency", "usd".to_string()),
                    ("days", days.to_string()),
                    ("interval", "daily".to_string()),
                ],
            )
            .await?;
        Ok(to_price_points(&chart.prices))
    }

    async fn fetch_spot(&self, asset: Asset) -> Result<f64> {
        let id = asset.coingecko_id();
        let prices: SimplePrice = self
            .get(
                "simple/price",
                &[("ids", id.to_string()), ("vs_currencies", "usd".to_string())],
            )
            .await?;
        prices
            .get(id)
            .and_then(|p| p.get("usd"))
            .copied()
            .with_context(|| format!("CoinGecko returned no USD price for {asset}"))
    }
}

/// Convert `[ms, price]` pairs to points sorted oldest first.
fn to_price_points(raw: &[(f64, f64)]) -> Vec<PricePoint> {
    let mut points: Vec<PricePoint> = raw
        .iter()
        .map(|&(ms, price)| PricePoint {
            timestamp: (ms / 1000.0) as u64,
            price,
        })
        .collect();
    points.sort_by_key(|p| p.timestamp);
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_chart_parses_and_sorts() {
        let json = r#"{
            "prices": [[1704153600000, 2350.5], [1704067200000, 2281.1]],
            "market_caps": [],
            "total_volumes": []
        }"#;
        let chart: MarketChart = serde_json::from_str(json).unwrap();
        let points = to_price_points(&chart.prices);
        assert_eq!(points[0], PricePoint { timestamp: 1704067200, price: 2281.1 });
        assert_eq!(points[1].price, 2350.5);
    }

    #[test]
    fn test_simple_price_shape() {
        let json = r#"{ "solana": { "usd": 101.25 } }"#;
        let prices: SimplePrice = serde_json::from_str(json).unwrap();
        assert_eq!(prices["solana"]["usd"], 101.25);
    }
}
