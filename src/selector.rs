use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::alt_iv::compute_model_iv_with_call_atmf;
use crate::error::{Result, StrikeError};
use crate::model::{Asset, MarketSnapshot, OptionSide};
use crate::strikes::{ten_delta_strike_from_chain, ten_delta_strike_with_bsm};

/// Reference market used to model alts when none is specified.
pub const DEFAULT_REFERENCE_ASSET: Asset = Asset::Eth;

/// Where a selected strike came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuoteSource {
    /// Walked from the listed Deribit chain.
    Chain,
    /// Solved with Black-Scholes at a modelled IV.
    Model,
}

/// 10-delta strike chosen for a vault round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StrikeSelection {
    pub asset: Asset,
    pub side: OptionSide,
    pub spot: f64,
    pub strike: f64,
    pub delta: f64,
    /// Bid premium per contract in USD.
    pub price_usd: f64,
    /// Bid IV in percent.
    pub iv: f64,
    pub source: QuoteSource,
}

/// Picks the 10-delta strike for `asset`: listed assets read their own
/// chain, alts are priced off a model IV derived from `reference`.
pub fn select_strike(
    snapshot: &MarketSnapshot,
    asset: Asset,
    side: OptionSide,
    reference: Asset,
    now: DateTime<Utc>,
) -> Result<StrikeSelection> {
    let spot = snapshot.spot(asset);
    if spot == 0.0 {
        return Err(StrikeError::SpotIsZero { asset: Some(asset) });
    }
    let options = snapshot.options(side);

    if asset.is_reference() {
        let chain = options
            .chain(asset)
            .ok_or(StrikeError::MissingChain { asset })?;
        let quote = ten_delta_strike_from_chain(side.is_put(), spot, asset.step(), chain)?;
        return Ok(StrikeSelection {
            asset,
            side,
            spot,
            strike: quote.strike_price as f64,
            delta: quote.delta,
            price_usd: quote.bid_price_in_usd,
            iv: quote.bid_iv,
            source: QuoteSource::Chain,
        });
    }

    let ref_spot = snapshot.spot(reference);
    if ref_spot == 0.0 {
        return Err(StrikeError::SpotIsZero {
            asset: Some(reference),
        });
    }
    let model = compute_model_iv_with_call_atmf(
        reference,
        side.is_put(),
        asset,
        ref_spot,
        &snapshot.calls,
        options,
        &snapshot.realized_vols,
    )?;
    let strike = ten_delta_strike_with_bsm(
        side.is_put(),
        spot,
        asset.step(),
        model.bid_iv / 100.0,
        now,
    )?;

    Ok(StrikeSelection {
        asset,
        side,
        spot,
        strike: strike.strike,
        delta: strike.delta,
        price_usd: strike.price,
        iv: model.bid_iv,
        source: QuoteSource::Model,
    })
}
