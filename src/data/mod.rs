pub mod csv_types;

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{Asset, AssetOptions, MarketSnapshot, OptionChain, OptionSide};
use crate::realized::realized_vols_from_prices;

use csv_types::{OptionCsvRow, PriceCsvRow, SpotCsvRow};

pub const OPTIONS_FILE: &str = "options.csv";
pub const PRICES_FILE: &str = "prices.csv";
pub const SPOTS_FILE: &str = "spots.csv";

/// Load CSV rows of type T from a file in the data directory.
pub fn load_csv<T: for<'de> Deserialize<'de>>(data_dir: &Path, filename: &str) -> Result<Vec<T>> {
    let path = data_dir.join(filename);
    let mut rdr = csv::Reader::from_path(&path)
        .with_context(|| format!("opening CSV file {}", path.display()))?;
    let rows: Vec<T> = rdr
        .deserialize()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("parsing CSV file {}", path.display()))?;
    Ok(rows)
}

pub fn write_csv<T: Serialize>(data_dir: &Path, filename: &str, rows: &[T]) -> Result<()> {
    let path = data_dir.join(filename);
    let mut wtr = csv::Writer::from_path(&path)
        .with_context(|| format!("creating CSV file {}", path.display()))?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Build a market snapshot from `options.csv`, `prices.csv` and, when
/// present, `spots.csv` in the data directory.
pub fn load_snapshot(data_dir: &Path) -> Result<MarketSnapshot> {
    let options: Vec<OptionCsvRow> = load_csv(data_dir, OPTIONS_FILE)?;
    let prices: Vec<PriceCsvRow> = load_csv(data_dir, PRICES_FILE)?;
    let spots: Vec<SpotCsvRow> = if data_dir.join(SPOTS_FILE).exists() {
        load_csv(data_dir, SPOTS_FILE)?
    } else {
        Vec::new()
    };
    Ok(snapshot_from_rows(options, prices, spots))
}

/// Assemble a snapshot. Spots default to the newest close in the price
/// history; explicit spot rows override them.
pub fn snapshot_from_rows(
    options: Vec<OptionCsvRow>,
    prices: Vec<PriceCsvRow>,
    spots: Vec<SpotCsvRow>,
) -> MarketSnapshot {
    let mut chains: BTreeMap<(OptionSide, Asset), OptionChain> = BTreeMap::new();
    for row in options {
        chains
            .entry((row.side, row.asset))
            .or_default()
            .insert(row.into_quote());
    }
    let mut calls = AssetOptions::new();
    let mut puts = AssetOptions::new();
    for ((side, asset), chain) in chains {
        match side {
            OptionSide::Call => calls.insert(asset, chain),
            OptionSide::Put => puts.insert(asset, chain),
        }
    }

    let mut by_asset: BTreeMap<Asset, Vec<PriceCsvRow>> = BTreeMap::new();
    for row in prices {
        by_asset.entry(row.asset).or_default().push(row);
    }
    let histories: BTreeMap<Asset, Vec<f64>> = by_asset
        .into_iter()
        .map(|(asset, mut rows)| {
            rows.sort_by_key(|r| r.timestamp);
            (asset, rows.into_iter().map(|r| r.price).collect())
        })
        .collect();

    let mut spot_map: BTreeMap<Asset, f64> = histories
        .iter()
        .filter_map(|(asset, prices)| prices.last().map(|p| (*asset, *p)))
        .collect();
    spot_map.extend(spots.into_iter().map(|s| (s.asset, s.price)));

    MarketSnapshot {
        calls,
        puts,
        spots: spot_map,
        realized_vols: realized_vols_from_prices(&histories),
    }
}

/// Flatten both sides of the snapshot's chains into CSV rows.
pub fn option_rows(snapshot: &MarketSnapshot) -> Vec<OptionCsvRow> {
    let mut rows = Vec::new();
    for side in [OptionSide::Call, OptionSide::Put] {
        let options = snapshot.options(side);
        for asset in options.assets() {
            if let Some(chain) = options.chain(asset) {
                rows.extend(chain.quotes().map(|q| OptionCsvRow::from_quote(side, q)));
            }
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option_row(side: OptionSide, strike: u64, delta: f64) -> OptionCsvRow {
        OptionCsvRow {
            asset: Asset::Eth,
            side,
            strike_price: strike,
            delta,
            bid_price: 0.01,
            bid_price_in_usd: 20.0,
            bid_iv: 60.0,
            mark_iv: 62.0,
            mark_price: 0.011,
        }
    }

    #[test]
    fn test_rows_split_by_side() {
        let snapshot = snapshot_from_rows(
            vec![
                option_row(OptionSide::Call, 2100, 0.3),
                option_row(OptionSide::Put, 1900, -0.3),
                option_row(OptionSide::Put, 1850, -0.2),
            ],
            vec![],
            vec![],
        );
        assert_eq!(snapshot.calls.chain(Asset::Eth).unwrap().len(), 1);
        assert_eq!(snapshot.puts.chain(Asset::Eth).unwrap().len(), 2);
        assert_eq!(option_rows(&snapshot).len(), 3);
    }

    #[test]
    fn test_spot_prefers_explicit_rows() {
        let prices = vec![
            PriceCsvRow { asset: Asset::Sol, timestamp: 200, price: 101.0 },
            PriceCsvRow { asset: Asset::Sol, timestamp: 100, price: 99.0 },
            PriceCsvRow { asset: Asset::Eth, timestamp: 100, price: 2000.0 },
        ];
        let spots = vec![SpotCsvRow { asset: Asset::Eth, price: 2010.0 }];
        let snapshot = snapshot_from_rows(vec![], prices, spots);
        assert_eq!(snapshot.spot(Asset::Sol), 101.0);
        assert_eq!(snapshot.spot(Asset::Eth), 2010.0);
        assert_eq!(snapshot.spot(Asset::Btc), 0.0);
    }

    #[test]
    fn test_csv_roundtrip_through_disk() {
        let dir = std::env::temp_dir().join("strike_model_data_test");
        std::fs::create_dir_all(&dir).unwrap();

        let rows = vec![option_row(OptionSide::Put, 1900, -0.3)];
        write_csv(&dir, OPTIONS_FILE, &rows).unwrap();
        let loaded: Vec<OptionCsvRow> = load_csv(&dir, OPTIONS_FILE).unwrap();

        let _ = std::fs::remove_dir_all(&dir);
        assert_eq!(loaded, rows);
    }
}
