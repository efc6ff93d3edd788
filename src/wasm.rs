use chrono::DateTime;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::model::{Asset, AssetOptions, OptionChain, RealizedVols};
use crate::{alt_iv, pricing, regression, strikes};

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|e| error_json(format!("Serialization error: {}", e)))
}

fn error_json(message: String) -> String {
    serde_json::json!({ "error": message }).to_string()
}

fn respond<T: Serialize, E: std::fmt::Display>(result: Result<T, E>) -> String {
    match result {
        Ok(value) => to_json(&value),
        Err(e) => error_json(e.to_string()),
    }
}

/// `{"delta": .., "price": ..}` for one option.
#[wasm_bindgen]
pub fn black_scholes(
    is_put: bool,
    spot: f64,
    strike: f64,
    implied_vol: f64,
    time_left_in_years: f64,
    risk_free_rate: f64,
) -> String {
    let g = pricing::black_scholes(
        is_put,
        spot,
        strike,
        implied_vol,
        time_left_in_years,
        risk_free_rate,
    );
    serde_json::json!({ "delta": g.delta, "price": g.price }).to_string()
}

/// `chain_json` is an object of quotes keyed by strike.
#[wasm_bindgen]
pub fn ten_delta_strike_from_chain(is_put: bool, spot: f64, step: f64, chain_json: &str) -> String {
    let chain: OptionChain = match serde_json::from_str(chain_json) {
        Ok(c) => c,
        Err(e) => return error_json(format!("JSON parse error: {}", e)),
    };
    respond(strikes::ten_delta_strike_from_chain(is_put, spot, step, &chain))
}

#[wasm_bindgen]
pub fn ten_delta_strike_with_bsm(
    is_put: bool,
    spot: f64,
    step: f64,
    iv: f64,
    now_ms: f64,
) -> String {
    let Some(now) = DateTime::from_timestamp_millis(now_ms as i64) else {
        return error_json(format!("invalid timestamp {now_ms}"));
    };
    respond(strikes::ten_delta_strike_with_bsm(is_put, spot, step, iv, now))
}

#[wasm_bindgen]
pub fn linear_regression(values_y: Vec<f64>, values_x: Vec<f64>) -> String {
    respond(regression::linear_regression(&values_y, &values_x))
}

#[wasm_bindgen]
pub fn rolling_linear_regression(values_y: Vec<f64>, values_x: Vec<f64>, window: usize) -> String {
    respond(regression::rolling_linear_regression(&values_y, &values_x, window))
}

/// `options_json` maps asset symbols to chains for the requested side;
/// `realized_vols_json` maps asset symbols to vol series, oldest first.
#[wasm_bindgen]
pub fn compute_model_iv_for_alts(
    ref_asset: &str,
    is_put: bool,
    altcoin: &str,
    ref_spot_price: f64,
    options_json: &str,
    realized_vols_json: &str,
) -> String {
    let ref_asset: Asset = match ref_asset.parse() {
        Ok(a) => a,
        Err(e) => return error_json(format!("{}", e)),
    };
    let altcoin: Asset = match altcoin.parse() {
        Ok(a) => a,
        Err(e) => return error_json(format!("{}", e)),
    };
    let options: AssetOptions = match serde_json::from_str(options_json) {
        Ok(o) => o,
        Err(e) => return error_json(format!("JSON parse error: {}", e)),
    };
    let vols: RealizedVols = match serde_json::from_str(realized_vols_json) {
        Ok(v) => v,
        Err(e) => return error_json(format!("JSON parse error: {}", e)),
    };
    respond(alt_iv::compute_model_iv_for_alts(
        ref_asset,
        is_put,
        altcoin,
        ref_spot_price,
        &options,
        &vols,
    ))
}

#[wasm_bindgen]
pub fn get_schema() -> String {
    crate::schema::get_schema_json()
}
