use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::asset::Asset;

/// One market-observed quote. IVs are in percent, `bid_price` and
/// `mark_price` in units of the underlying.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionQuote {
    pub asset: Asset,
    pub strike_price: u64,
    pub delta: f64,
    pub bid_price: f64,
    #[serde(rename = "bidPriceInUSD")]
    pub bid_price_in_usd: f64,
    #[serde(rename = "bidIV")]
    pub bid_iv: f64,
    #[serde(rename = "markIV")]
    pub mark_iv: f64,
    pub mark_price: f64,
}

/// Quotes for one asset and one side, keyed by strike.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionChain(BTreeMap<u64, OptionQuote>);

impl OptionChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a strike. Negative strikes are never listed.
    pub fn get(&self, strike: i64) -> Option<&OptionQuote> {
        u64::try_from(strike).ok().and_then(|s| self.0.get(&s))
    }

    pub fn insert(&mut self, quote: OptionQuote) {
        self.0.insert(quote.strike_price, quote);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Quotes in ascending strike order.
    pub fn quotes(&self) -> impl Iterator<Item = &OptionQuote> {
        self.0.values()
    }

    pub fn strikes(&self) -> impl Iterator<Item = u64> + '_ {
        self.0.keys().copied()
    }
}

impl FromIterator<OptionQuote> for OptionChain {
    fn from_iter<I: IntoIterator<Item = OptionQuote>>(iter: I) -> Self {
        OptionChain(iter.into_iter().map(|q| (q.strike_price, q)).collect())
    }
}

/// Option chains per asset for one side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetOptions(BTreeMap<Asset, OptionChain>);

impl AssetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chain(&self, asset: Asset) -> Option<&OptionChain> {
        self.0.get(&asset)
    }

    pub fn insert(&mut self, asset: Asset, chain: OptionChain) {
        self.0.insert(asset, chain);
    }

    pub fn assets(&self) -> impl Iterator<Item = Asset> + '_ {
        self.0.keys().copied()
    }

    /// Shallow per-asset overwrite: every chain in `refresh` replaces the
    /// stored chain wholesale, assets missing from `refresh` are kept.
    pub fn merge(&mut self, refresh: AssetOptions) {
        self.0.extend(refresh.0);
    }
}

impl FromIterator<(Asset, OptionChain)> for AssetOptions {
    fn from_iter<I: IntoIterator<Item = (Asset, OptionChain)>>(iter: I) -> Self {
        AssetOptions(iter.into_iter().collect())
    }
}

/// Strike found by a delta solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StrikeData {
    pub delta: f64,
    pub strike: f64,
    pub price: f64,
}

/// Modelled implied vols for an unlisted asset, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModelIv {
    #[serde(rename = "markIV")]
    pub mark_iv: f64,
    #[serde(rename = "bidIV")]
    pub bid_iv: f64,
}
