use crate::error::{Result, StrikeError};
use crate::model::{OptionChain, OptionQuote};

use super::interpolate::linearly_interpolate_option_chain;
use super::{before_target, pick_closest, starting_strike, ten_delta_target};

/// Steps out of the money the chain walk starts from.
const CHAIN_START_OFFSET_STEPS: f64 = 2.0;

/// Walk a listed chain for the quote whose delta is closest to `target_delta`.
///
/// The chain is gap-filled first. A missing starting strike is an error; a
/// chain that runs out before the target is crossed returns the best of the
/// last two quotes visited.
pub fn strike_at_delta_from_chain(
    is_put: bool,
    spot: f64,
    step: f64,
    chain: &OptionChain,
    target_delta: f64,
) -> Result<OptionQuote> {
    if spot == 0.0 || spot.is_nan() {
        return Err(StrikeError::SpotIsZero { asset: None });
    }

    let chain = linearly_interpolate_option_chain(chain, step);
    let direction = if is_put { -1.0 } else { 1.0 };

    let mut strike = starting_strike(is_put, spot, step, CHAIN_START_OFFSET_STEPS);
    let mut current = chain
        .get(strike_key(strike))
        .ok_or(StrikeError::OptionChainIncomplete {
            strike: strike_key(strike),
        })?;
    let mut previous: Option<&OptionQuote> = None;

    while before_target(is_put, current.delta, target_delta) {
        strike += step * direction;
        match chain.get(strike_key(strike)) {
            Some(next) => {
                previous = Some(current);
                current = next;
            }
            None => break,
        }
    }

    Ok(pick_closest(previous, current, target_delta, |q| q.delta).clone())
}

/// 10-delta quote for the side (`-0.1` for puts, `0.1` for calls).
pub fn ten_delta_strike_from_chain(
    is_put: bool,
    spot: f64,
    step: f64,
    chain: &OptionChain,
) -> Result<OptionQuote> {
    strike_at_delta_from_chain(is_put, spot, step, chain, ten_delta_target(is_put))
}

fn strike_key(strike: f64) -> i64 {
    strike.round() as i64
}
