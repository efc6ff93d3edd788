use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::asset::{Asset, OptionSide};
use super::option::AssetOptions;

/// Historical realized vols per asset, oldest first, annualised decimals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RealizedVols(BTreeMap<Asset, Vec<f64>>);

impl RealizedVols {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, asset: Asset) -> Option<&[f64]> {
        self.0.get(&asset).map(Vec::as_slice)
    }

    pub fn insert(&mut self, asset: Asset, vols: Vec<f64>) {
        self.0.insert(asset, vols);
    }

    pub fn assets(&self) -> impl Iterator<Item = Asset> + '_ {
        self.0.keys().copied()
    }
}

impl FromIterator<(Asset, Vec<f64>)> for RealizedVols {
    fn from_iter<I: IntoIterator<Item = (Asset, Vec<f64>)>>(iter: I) -> Self {
        RealizedVols(iter.into_iter().collect())
    }
}

/// Everything the pricing functions read, captured at one point in time.
///
/// Refreshes build a new chain set and merge it in; nothing is mutated while
/// a selection is running.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    #[serde(default)]
    pub calls: AssetOptions,
    #[serde(default)]
    pub puts: AssetOptions,
    #[serde(default)]
    pub spots: BTreeMap<Asset, f64>,
    #[serde(default)]
    pub realized_vols: RealizedVols,
}

impl MarketSnapshot {
    pub fn options(&self, side: OptionSide) -> &AssetOptions {
        match side {
            OptionSide::Call => &self.calls,
            OptionSide::Put => &self.puts,
        }
    }

    /// Spot price, zero when unknown.
    pub fn spot(&self, asset: Asset) -> f64 {
        self.spots.get(&asset).copied().unwrap_or(0.0)
    }
}
