use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::StrikeError;

/// Underlying assets the vaults write options on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Asset {
    Btc,
    Eth,
    Sol,
    Avax,
    Near,
    Aave,
}

impl Asset {
    pub const ALL: [Asset; 6] = [
        Asset::Btc,
        Asset::Eth,
        Asset::Sol,
        Asset::Avax,
        Asset::Near,
        Asset::Aave,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Asset::Btc => "BTC",
            Asset::Eth => "ETH",
            Asset::Sol => "SOL",
            Asset::Avax => "AVAX",
            Asset::Near => "NEAR",
            Asset::Aave => "AAVE",
        }
    }

    /// Strike rounding granularity.
    pub fn step(&self) -> f64 {
        match self {
            Asset::Btc => 1000.0,
            Asset::Eth => 50.0,
            Asset::Sol => 5.0,
            Asset::Avax => 1.0,
            Asset::Near => 0.25,
            Asset::Aave => 5.0,
        }
    }

    /// Deribit currency for assets with a listed option market.
    pub fn deribit_currency(&self) -> Option<&'static str> {
        match self {
            Asset::Btc => Some("BTC"),
            Asset::Eth => Some("ETH"),
            Asset::Sol | Asset::Avax | Asset::Near | Asset::Aave => None,
        }
    }

    /// Listed on Deribit, so its chain can be walked directly.
    pub fn is_reference(&self) -> bool {
        self.deribit_currency().is_some()
    }

    pub fn coingecko_id(&self) -> &'static str {
        match self {
            Asset::Btc => "bitcoin",
            Asset::Eth => "ethereum",
            Asset::Sol => "solana",
            Asset::Avax => "avalanche-2",
            Asset::Near => "near",
            Asset::Aave => "aave",
        }
    }

    pub fn references() -> impl Iterator<Item = Asset> {
        Self::ALL.into_iter().filter(Asset::is_reference)
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Asset {
    type Err = StrikeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Asset::ALL
            .into_iter()
            .find(|a| a.symbol() == upper)
            .ok_or_else(|| StrikeError::UnsupportedAsset(s.to_string()))
    }
}

/// Call or put.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum OptionSide {
    Call,
    Put,
}

impl OptionSide {
    pub fn from_is_put(is_put: bool) -> Self {
        if is_put { OptionSide::Put } else { OptionSide::Call }
    }

    pub fn is_put(&self) -> bool {
        matches!(self, OptionSide::Put)
    }

    pub fn name(&self) -> &'static str {
        match self {
            OptionSide::Call => "call",
            OptionSide::Put => "put",
        }
    }
}

impl fmt::Display for OptionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OptionSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "call" | "calls" | "c" => Ok(OptionSide::Call),
            "put" | "puts" | "p" => Ok(OptionSide::Put),
            other => Err(format!("invalid option side '{other}', use 'call' or 'put'")),
        }
    }
}
