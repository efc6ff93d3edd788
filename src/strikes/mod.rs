//! Delta-targeted strike search.
//!
//! Both solvers start a fixed number of steps out of the money, walk further
//! out one `step` at a time until the delta crosses the target, and return
//! whichever of the last two strikes is closer to it. Ties go to the strike
//! visited first, i.e. the one nearer to spot.

pub mod bsm;
pub mod chain;
pub mod interpolate;

pub use bsm::{strike_at_delta_with_bsm, ten_delta_strike_with_bsm};
pub use chain::{strike_at_delta_from_chain, ten_delta_strike_from_chain};
pub use interpolate::{GapFill, interpolate_option_chain, linearly_interpolate_option_chain};

pub const TEN_DELTA: f64 = 0.1;

/// Signed 10-delta target for the side.
pub fn ten_delta_target(is_put: bool) -> f64 {
    if is_put { -TEN_DELTA } else { TEN_DELTA }
}

/// Still short of the target. Put deltas rise toward zero and call deltas
/// fall toward zero as strikes move out of the money.
fn before_target(is_put: bool, delta: f64, target_delta: f64) -> bool {
    if is_put {
        delta <= target_delta
    } else {
        delta >= target_delta
    }
}

/// First strike of the walk: `offset_steps` steps out of the money from spot,
/// snapped to the `step` grid.
fn starting_strike(is_put: bool, spot: f64, step: f64, offset_steps: f64) -> f64 {
    let direction = if is_put { -1.0 } else { 1.0 };
    spot + offset_steps * step * direction - spot % step
}

fn pick_closest<T>(
    previous: Option<T>,
    current: T,
    target_delta: f64,
    delta: impl Fn(&T) -> f64,
) -> T {
    match previous {
        Some(prev)
            if (delta(&prev) - target_delta).abs() <= (delta(&current) - target_delta).abs() =>
        {
            prev
        }
        _ => current,
    }
}
