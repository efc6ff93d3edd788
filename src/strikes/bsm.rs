use chrono::{DateTime, Utc};

use crate::error::{Result, StrikeError};
use crate::model::StrikeData;
use crate::pricing::{black_scholes, years_until_next_expiry};

use super::{before_target, pick_closest, starting_strike, ten_delta_target};

/// Steps out of the money the model walk starts from. Differs from the chain
/// walk's offset; changing either moves the selected strikes.
const BSM_START_OFFSET_STEPS: f64 = 1.0;

const PRICE_DECIMALS: i32 = 5;

/// Walk model strikes for the one whose Black-Scholes delta is closest to
/// `target_delta`. `iv` is a decimal (0.8 for 80%).
pub fn strike_at_delta_with_bsm(
    is_put: bool,
    spot: f64,
    step: f64,
    iv: f64,
    target_delta: f64,
    time_left_in_years: f64,
) -> Result<StrikeData> {
    if spot == 0.0 || spot.is_nan() {
        return Err(StrikeError::SpotIsZero { asset: None });
    }
    if step.is_nan() || step <= 0.0 {
        return Err(StrikeError::InvalidStep { step });
    }
    if !iv.is_finite() || iv <= 0.0 {
        return Err(StrikeError::InvalidVol { iv });
    }
    let reachable = if is_put {
        target_delta > -1.0 && target_delta < 0.0
    } else {
        target_delta > 0.0 && target_delta < 1.0
    };
    if !reachable {
        return Err(StrikeError::InvalidTargetDelta {
            target: target_delta,
            side: if is_put { "put" } else { "call" },
        });
    }

    let direction = if is_put { -1.0 } else { 1.0 };
    let price_at = |strike: f64| {
        let greeks = black_scholes(is_put, spot, strike, iv, time_left_in_years, 0.0);
        StrikeData {
            delta: greeks.delta,
            strike,
            price: round_to(greeks.price, PRICE_DECIMALS),
        }
    };

    let mut strike = starting_strike(is_put, spot, step, BSM_START_OFFSET_STEPS);
    let mut current = price_at(strike);
    let mut previous = None;

    while before_target(is_put, current.delta, target_delta) {
        let next = strike + step * direction;
        // Off the grid: the step no longer moves the strike, or puts ran out of strikes.
        if next == strike || next <= 0.0 {
            break;
        }
        strike = next;
        previous = Some(current);
        current = price_at(strike);
    }

    Ok(pick_closest(previous, current, target_delta, |s| s.delta))
}

/// 10-delta model strike for the weekly expiry following `now`.
pub fn ten_delta_strike_with_bsm(
    is_put: bool,
    spot: f64,
    step: f64,
    iv: f64,
    now: DateTime<Utc>,
) -> Result<StrikeData> {
    strike_at_delta_with_bsm(
        is_put,
        spot,
        step,
        iv,
        ten_delta_target(is_put),
        years_until_next_expiry(now),
    )
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
