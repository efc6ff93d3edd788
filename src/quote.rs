use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::Utc;

use strike_model::alt_iv::compute_model_iv_with_call_atmf;
use strike_model::data::load_snapshot;
use strike_model::model::{Asset, OptionSide};
use strike_model::pricing::black_scholes;
use strike_model::selector::select_strike;

const DAYS_PER_YEAR: f64 = 365.0;

/// Entry point for the `price` command.
pub fn price(put: bool, spot: f64, strike: f64, iv: f64, days: f64, rate: f64) -> Result<()> {
    if days <= 0.0 {
        bail!("--days must be positive");
    }
    let greeks = black_scholes(put, spot, strike, iv, days / DAYS_PER_YEAR, rate);
    let json = serde_json::json!({
        "side": OptionSide::from_is_put(put),
        "spot": spot,
        "strike": strike,
        "iv": iv,
        "days": days,
        "price": greeks.price,
        "delta": greeks.delta,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

/// Entry point for the `strike` command.
pub fn strike(asset: Asset, side: OptionSide, data_dir: &Path, reference: Asset) -> Result<()> {
    let snapshot = load_snapshot(data_dir)
        .with_context(|| format!("loading market data from {}", data_dir.display()))?;
    let selection = select_strike(&snapshot, asset, side, reference, Utc::now())?;
    println!("{}", serde_json::to_string_pretty(&selection)?);
    Ok(())
}

/// Entry point for the `model-iv` command.
pub fn model_iv(alt: Asset, side: OptionSide, reference: Asset, data_dir: &Path) -> Result<()> {
    if alt.is_reference() {
        println!("NOTE: {alt} has a listed chain; the model IV is shown for comparison only.");
    }
    let snapshot = load_snapshot(data_dir)
        .with_context(|| format!("loading market data from {}", data_dir.display()))?;
    let model = compute_model_iv_with_call_atmf(
        reference,
        side.is_put(),
        alt,
        snapshot.spot(reference),
        &snapshot.calls,
        snapshot.options(side),
        &snapshot.realized_vols,
    )?;
    println!("{}", serde_json::to_string_pretty(&model)?);
    Ok(())
}
