pub mod providers;
pub mod types;

use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::config::FetchSettings;
use crate::data::csv_types::{OptionCsvRow, PriceCsvRow, SpotCsvRow};
use crate::data::{OPTIONS_FILE, PRICES_FILE, SPOTS_FILE, write_csv};
use crate::model::{Asset, OptionSide};

use providers::{CoinGeckoProvider, DeribitProvider};
pub use types::{AssetChains, OptionsProvider, PriceHistoryProvider, PricePoint};

/// Assets whose data a selection for `assets` needs: the assets themselves,
/// plus `reference` when any of them is priced off the model.
pub fn required_assets(assets: &[Asset], reference: Asset) -> Vec<Asset> {
    let mut out: Vec<Asset> = assets.to_vec();
    if assets.iter().any(|a| !a.is_reference()) {
        out.push(reference);
    }
    out.sort();
    out.dedup();
    out
}

/// Run the fetch-data command: pull chains, spots and price history, write
/// `options.csv`, `prices.csv` and `spots.csv`.
pub fn run(
    output_dir: &Path,
    assets: &[Asset],
    reference: Asset,
    settings: &FetchSettings,
) -> Result<()> {
    if !reference.is_reference() {
        bail!("{reference} has no listed options and cannot be a reference");
    }
    let assets = required_assets(assets, reference);
    if assets.is_empty() {
        println!("No assets requested. Nothing to fetch.");
        return Ok(());
    }

    println!(
        "Fetch plan: {} assets ({}), {} days of history",
        assets.len(),
        assets.iter().map(Asset::symbol).collect::<Vec<_>>().join(", "),
        settings.history_days
    );
    println!();

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    let rt = tokio::runtime::Runtime::new().context("creating async runtime")?;
    rt.block_on(async {
        let client = settings.http_client()?;
        let options = DeribitProvider::new(client.clone(), &settings.deribit_url);
        let prices = CoinGeckoProvider::new(
            client,
            &settings.coingecko_url,
            settings.coingecko_key.clone(),
        );

        let fetched = fetch_all(&options, &prices, &assets, settings.history_days).await;

        write_csv(output_dir, OPTIONS_FILE, &fetched.options)?;
        write_csv(output_dir, PRICES_FILE, &fetched.prices)?;
        write_csv(output_dir, SPOTS_FILE, &fetched.spots)?;

        println!(
            "\nDone: {} succeeded, {} failed. Wrote {} option rows, {} price rows, {} spots to {}",
            fetched.succeeded,
            fetched.failed,
            fetched.options.len(),
            fetched.prices.len(),
            fetched.spots.len(),
            output_dir.display()
        );

        if fetched.succeeded == 0 {
            bail!("every fetch failed");
        }
        Ok::<(), anyhow::Error>(())
    })?;

    Ok(())
}

/// Rows gathered by one fetch pass.
#[derive(Debug, Default)]
pub struct FetchedData {
    pub options: Vec<OptionCsvRow>,
    pub prices: Vec<PriceCsvRow>,
    pub spots: Vec<SpotCsvRow>,
    pub succeeded: u32,
    pub failed: u32,
}

/// Fetch chains for listed assets and history plus spot for every asset.
/// A failed job is reported and skipped.
pub async fn fetch_all(
    options: &dyn OptionsProvider,
    prices: &dyn PriceHistoryProvider,
    assets: &[Asset],
    days: u32,
) -> FetchedData {
    let mut out = FetchedData::default();
    let total = assets.len();

    for (i, &asset) in assets.iter().enumerate() {
        println!("[{}/{}] Fetching {} ...", i + 1, total, asset);

        match prices.fetch_prices(asset, days).await {
            Ok(points) => {
                println!("  OK  {} {} ({} closes)", prices.name(), asset, points.len());
                out.prices.extend(points.into_iter().map(|p| PriceCsvRow {
                    asset,
                    timestamp: p.timestamp,
                    price: p.price,
                }));
                out.succeeded += 1;
            }
            Err(e) => {
                println!("  WARN  {} history for {} failed: {:#}", prices.name(), asset, e);
                out.failed += 1;
            }
        }

        if asset.is_reference() {
            match options.fetch_chains(asset).await {
                Ok(chains) => {
                    println!(
                        "  OK  {} {} ({} calls, {} puts, spot {:.2})",
                        options.name(),
                        asset,
                        chains.calls.len(),
                        chains.puts.len(),
                        chains.spot
                    );
                    out.options.extend(
                        chains
                            .calls
                            .quotes()
                            .map(|q| OptionCsvRow::from_quote(OptionSide::Call, q)),
                    );
                    out.options.extend(
                        chains
                            .puts
                            .quotes()
                            .map(|q| OptionCsvRow::from_quote(OptionSide::Put, q)),
                    );
                    out.spots.push(SpotCsvRow {
                        asset,
                        price: chains.spot,
                    });
                    out.succeeded += 1;
                }
                Err(e) => {
                    println!("  WARN  {} chains for {} failed: {:#}", options.name(), asset, e);
                    out.failed += 1;
                }
            }
        } else {
            match prices.fetch_spot(asset).await {
                Ok(price) => {
                    out.spots.push(SpotCsvRow { asset, price });
                    out.succeeded += 1;
                }
                Err(e) => {
                    println!("  WARN  {} spot for {} failed: {:#}", prices.name(), asset, e);
                    out.failed += 1;
                }
            }
        }
    }

    out
}
