use thiserror::Error;

use crate::model::Asset;

/// Convenience alias for results of the numeric core.
pub type Result<T> = std::result::Result<T, StrikeError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StrikeError {
    #[error(
        "Spot price is zero{}",
        .asset.as_ref().map(|a| format!(" for {a}")).unwrap_or_default()
    )]
    SpotIsZero { asset: Option<Asset> },

    #[error("Option chain is incomplete: no quote for starting strike {strike}")]
    OptionChainIncomplete { strike: i64 },

    #[error("Length mismatch: {left} values vs {right} values")]
    LengthMismatch { left: usize, right: usize },

    #[error("Strike step must be positive, got {step}")]
    InvalidStep { step: f64 },

    #[error("Implied vol must be positive and finite, got {iv}")]
    InvalidVol { iv: f64 },

    #[error("Regression window must be at least 1")]
    InvalidWindow,

    #[error("Target delta {target} is unreachable on the {side} side")]
    InvalidTargetDelta { target: f64, side: &'static str },

    #[error("Unsupported asset `{0}`")]
    UnsupportedAsset(String),

    #[error("No option chain for {asset}")]
    MissingChain { asset: Asset },

    #[error("No realized volatility series for {asset}")]
    MissingRealizedVols { asset: Asset },

    #[error("Need at least {needed} realized-vol samples, have {have}")]
    InsufficientSamples { needed: usize, have: usize },
}
