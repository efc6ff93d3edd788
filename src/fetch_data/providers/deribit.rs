use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;

use crate::fetch_data::types::{AssetChains, OptionsProvider, retry};
use crate::model::{Asset, OptionQuote, OptionSide};
use crate::pricing::next_weekly_expiry;

/// Ticker requests in flight at once.
const MAX_CONCURRENT_TICKERS: usize = 8;

// ── API response types ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Instrument {
    pub instrument_name: String,
    pub strike: f64,
    pub option_type: String,
    /// ms
    pub expiration_timestamp: i64,
}

#[derive(Debug, Deserialize)]
pub struct Ticker {
    pub best_bid_price: Option<f64>,
    pub mark_price: f64,
    #[serde(default)]
    pub bid_iv: f64,
    pub mark_iv: f64,
    pub underlying_price: f64,
    pub greeks: TickerGreeks,
}

#[derive(Debug, Deserialize)]
pub struct TickerGreeks {
    pub delta: f64,
}

#[derive(Debug, Deserialize)]
struct IndexPrice {
    index_price: f64,
}

// ── Provider ─────────────────────────────────────────────────────────

/// Weekly option chains from Deribit's public JSON-RPC over HTTP.
pub struct DeribitProvider {
    client: reqwest::Client,
    base_url: String,
}

impl DeribitProvider {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}/public/{}", self.base_url, method);
        let resp = retry(3, || {
            let request = self.client.get(&url).query(query);
            async move {
                let r = request
                    .send()
                    .await?
                    .error_for_status()?
                    .json::<RpcResponse<T>>()
                    .await?;
                Ok(r.result)
            }
        })
        .await
        .with_context(|| format!("calling Deribit {method}"))?;
        Ok(resp)
    }

    async fn fetch_tickers(
        &self,
        asset: Asset,
        instruments: Vec<Instrument>,
    ) -> Result<Vec<(Instrument, Ticker)>> {
        let mut out = Vec::with_capacity(instruments.len());
        for batch in instruments.chunks(MAX_CONCURRENT_TICKERS) {
            let mut handles = Vec::with_capacity(batch.len());
            for instrument in batch.iter().cloned() {
                let client = self.client.clone();
                let url = format!("{}/public/ticker", self.base_url);
                handles.push(tokio::spawn(async move {
                    let ticker = retry(3, || {
                        let request = client
                            .get(&url)
                            .query(&[("instrument_name", instrument.instrument_name.as_str())]);
                        async move {
                            let r = request
                                .send()
                                .await?
                                .error_for_status()?
                                .json::<RpcResponse<Ticker>>()
                                .await?;
                            Ok(r.result)
                        }
                    })
                    .await
                    .with_context(|| format!("fetching ticker {}", instrument.instrument_name));
                    ticker.map(|t| (instrument, t))
                }));
            }
            for handle in handles {
                let pair = handle
                    .await
                    .with_context(|| format!("ticker task for {asset} panicked"))??;
                out.push(pair);
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl OptionsProvider for DeribitProvider {
    fn name(&self) -> &'static str {
        "deribit"
    }

    async fn fetch_chains(&self, asset: Asset) -> Result<AssetChains> {
        let Some(currency) = asset.deribit_currency() else {
            bail!("{asset} has no listed options on Deribit");
        };

        let instruments: Vec<Instrument> = self
            .get(
                "get_instruments",
                &[
                    ("currency", currency.to_string()),
                    ("kind", "option".to_string()),
                    ("expired", "false".to_string()),
                ],
            )
            .await?;
        let target_ms = next_weekly_expiry(Utc::now()).timestamp_millis();
        let weekly = select_expiry(instruments, target_ms);
        if weekly.is_empty() {
            bail!("Deribit lists no {currency} options");
        }

        let index: IndexPrice = self
            .get(
                "get_index_price",
                &[("index_name", format!("{}_usd", currency.to_lowercase()))],
            )
            .await?;

        let tickers = self.fetch_tickers(asset, weekly).await?;
        let mut chains = AssetChains {
            spot: index.index_price,
            ..Default::default()
        };
        for (instrument, ticker) in tickers {
            let quote = to_quote(asset, &instrument, &ticker);
            match parse_side(&instrument.option_type) {
                Some(OptionSide::Call) => chains.calls.insert(quote),
                Some(OptionSide::Put) => chains.puts.insert(quote),
                None => eprintln!(
                    "  WARN: skipping {} with option_type '{}'",
                    instrument.instrument_name, instrument.option_type
                ),
            }
        }
        Ok(chains)
    }
}

// ── Mapping ──────────────────────────────────────────────────────────

/// Instruments of the listed expiry closest to `target_ms`.
pub fn select_expiry(instruments: Vec<Instrument>, target_ms: i64) -> Vec<Instrument> {
    let Some(expiry) = instruments
        .iter()
        .map(|i| i.expiration_timestamp)
        .min_by_key(|ts| (ts - target_ms).unsigned_abs())
    else {
        return Vec::new();
    };
    instruments
        .into_iter()
        .filter(|i| i.expiration_timestamp == expiry)
        .collect()
}

pub fn to_quote(asset: Asset, instrument: &Instrument, ticker: &Ticker) -> OptionQuote {
    let bid_price = ticker.best_bid_price.unwrap_or(0.0);
    OptionQuote {
        asset,
        strike_price: instrument.strike.round() as u64,
        delta: ticker.greeks.delta,
        bid_price,
        bid_price_in_usd: bid_price * ticker.underlying_price,
        bid_iv: ticker.bid_iv,
        mark_iv: ticker.mark_iv,
        mark_price: ticker.mark_price,
    }
}

fn parse_side(option_type: &str) -> Option<OptionSide> {
    option_type.parse().ok()
}
