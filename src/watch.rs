use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};

use crate::config::FetchSettings;
use crate::fetch_data::providers::{CoinGeckoProvider, DeribitProvider};
use crate::fetch_data::{OptionsProvider, PriceHistoryProvider, required_assets};
use crate::model::{Asset, AssetOptions, MarketSnapshot, OptionSide};
use crate::realized::realized_vols_from_prices;
use crate::selector::{StrikeSelection, select_strike};

/// CLI-facing config for the `watch` command.
pub struct WatchConfig {
    pub assets: Vec<Asset>,
    pub sides: Vec<OptionSide>,
    pub reference: Asset,
    pub once: bool,
    pub settings: FetchSettings,
}

/// Outcome of one refresh.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PollReport {
    pub refreshed: Vec<Asset>,
    pub failed: Vec<(Asset, String)>,
}

/// Keeps a market snapshot current by polling the providers.
///
/// Realized vols are computed once from the price history; chains and spots
/// are refreshed on every poll. A failed refresh leaves the previous data for
/// that asset in place.
pub struct Poller {
    options: Box<dyn OptionsProvider>,
    prices: Box<dyn PriceHistoryProvider>,
    assets: Vec<Asset>,
    snapshot: MarketSnapshot,
}

impl Poller {
    pub fn new(
        options: Box<dyn OptionsProvider>,
        prices: Box<dyn PriceHistoryProvider>,
        assets: Vec<Asset>,
    ) -> Self {
        Self {
            options,
            prices,
            assets,
            snapshot: MarketSnapshot::default(),
        }
    }

    pub fn snapshot(&self) -> &MarketSnapshot {
        &self.snapshot
    }

    /// Fetch price history and derive realized vols. Returns how many assets
    /// loaded; assets that fail are reported and left without vols.
    pub async fn load_history(&mut self, days: u32) -> usize {
        let mut histories = std::collections::BTreeMap::new();
        for &asset in &self.assets {
            match self.prices.fetch_prices(asset, days).await {
                Ok(points) => {
                    histories.insert(asset, points.into_iter().map(|p| p.price).collect());
                }
                Err(e) => eprintln!(
                    "  WARN: {} history for {} failed: {:#}",
                    self.prices.name(),
                    asset,
                    e
                ),
            }
        }
        self.snapshot.realized_vols = realized_vols_from_prices(&histories);
        histories.len()
    }

    /// Refresh chains for listed assets and spots for everything else, then
    /// merge the result into the snapshot one asset at a time.
    pub async fn poll_once(&mut self) -> PollReport {
        let mut report = PollReport::default();
        let mut calls = AssetOptions::new();
        let mut puts = AssetOptions::new();

        for &asset in &self.assets {
            if asset.is_reference() {
                match self.options.fetch_chains(asset).await {
                    Ok(chains) => {
                        calls.insert(asset, chains.calls);
                        puts.insert(asset, chains.puts);
                        self.snapshot.spots.insert(asset, chains.spot);
                        report.refreshed.push(asset);
                    }
                    Err(e) => report.failed.push((asset, format!("{e:#}"))),
                }
            } else {
                match self.prices.fetch_spot(asset).await {
                    Ok(price) => {
                        self.snapshot.spots.insert(asset, price);
                        report.refreshed.push(asset);
                    }
                    Err(e) => report.failed.push((asset, format!("{e:#}"))),
                }
            }
        }

        self.snapshot.calls.merge(calls);
        self.snapshot.puts.merge(puts);
        report
    }

    /// Select strikes for `assets` against the current snapshot.
    pub fn select(
        &self,
        assets: &[Asset],
        sides: &[OptionSide],
        reference: Asset,
        now: DateTime<Utc>,
    ) -> Vec<(Asset, OptionSide, crate::Result<StrikeSelection>)> {
        let mut out = Vec::new();
        for &asset in assets {
            for &side in sides {
                out.push((asset, side, select_strike(&self.snapshot, asset, side, reference, now)));
            }
        }
        out
    }
}

/// Entry point for the `watch` command.
pub fn run(config: WatchConfig) -> Result<()> {
    if !config.reference.is_reference() {
        bail!(
            "{} has no listed options and cannot be a reference",
            config.reference
        );
    }
    if config.assets.is_empty() || config.sides.is_empty() {
        bail!("nothing to watch: pass at least one asset and side");
    }

    println!("=== strike-model watch ===");
    println!(
        "Assets:    {}",
        config.assets.iter().map(Asset::symbol).collect::<Vec<_>>().join(", ")
    );
    println!(
        "Sides:     {}",
        config.sides.iter().map(OptionSide::name).collect::<Vec<_>>().join(", ")
    );
    println!("Reference: {}", config.reference);
    println!("Interval:  {}s", config.settings.poll_interval.as_secs());
    println!("Once:      {}", config.once);
    println!();

    let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
    rt.block_on(run_async(config))
}

async fn run_async(config: WatchConfig) -> Result<()> {
    let settings = &config.settings;
    let client = settings.http_client()?;
    let options = DeribitProvider::new(client.clone(), &settings.deribit_url);
    let prices = CoinGeckoProvider::new(
        client,
        &settings.coingecko_url,
        settings.coingecko_key.clone(),
    );

    let mut poller = Poller::new(
        Box::new(options),
        Box::new(prices),
        required_assets(&config.assets, config.reference),
    );

    let loaded = poller.load_history(settings.history_days).await;
    println!("Loaded price history for {loaded} assets.\n");

    let mut interval = tokio::time::interval(settings.poll_interval);
    loop {
        interval.tick().await;
        let now = Utc::now();

        let report = poller.poll_once().await;
        for (asset, err) in &report.failed {
            eprintln!("  WARN: refresh for {asset} failed, keeping previous data: {err}");
        }

        println!(
            "[{}] Refreshed {} assets",
            now.format("%Y-%m-%d %H:%M:%S"),
            report.refreshed.len()
        );
        let selections = poller.select(&config.assets, &config.sides, config.reference, now);
        for (asset, side, selection) in selections {
            match selection {
                Ok(s) => println!(
                    "  {} {:<4} strike {:>10.2}  delta {:>7.4}  bid ${:.4}  iv {:.2}%  ({:?})",
                    asset, side.name(), s.strike, s.delta, s.price_usd, s.iv, s.source
                ),
                Err(e) => eprintln!("  ERROR {asset} {side}: {e}"),
            }
        }
        println!();

        if config.once {
            break;
        }
    }

    Ok(())
}
