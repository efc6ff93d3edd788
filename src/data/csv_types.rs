use serde::{Deserialize, Serialize};

use crate::model::{Asset, OptionQuote, OptionSide};

/// One option quote, one line of `options.csv`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OptionCsvRow {
    pub asset: Asset,
    pub side: OptionSide,
    pub strike_price: u64,
    pub delta: f64,
    pub bid_price: f64,
    pub bid_price_in_usd: f64,
    pub bid_iv: f64,
    pub mark_iv: f64,
    pub mark_price: f64,
}

impl OptionCsvRow {
    pub fn from_quote(side: OptionSide, q: &OptionQuote) -> Self {
        Self {
            asset: q.asset,
            side,
            strike_price: q.strike_price,
            delta: q.delta,
            bid_price: q.bid_price,
            bid_price_in_usd: q.bid_price_in_usd,
            bid_iv: q.bid_iv,
            mark_iv: q.mark_iv,
            mark_price: q.mark_price,
        }
    }

    pub fn into_quote(self) -> OptionQuote {
        OptionQuote {
            asset: self.asset,
            strike_price: self.strike_price,
            delta: self.delta,
            bid_price: self.bid_price,
            bid_price_in_usd: self.bid_price_in_usd,
            bid_iv: self.bid_iv,
            mark_iv: self.mark_iv,
            mark_price: self.mark_price,
        }
    }
}

/// Daily close, one line of `prices.csv`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PriceCsvRow {
    pub asset: Asset,
    /// Unix seconds.
    pub timestamp: u64,
    pub price: f64,
}

/// Current spot, one line of `spots.csv`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SpotCsvRow {
    pub asset: Asset,
    pub price: f64,
}
