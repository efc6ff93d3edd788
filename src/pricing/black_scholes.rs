use std::f64::consts::PI;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One week, the tenor of the weekly vault options.
pub const DEFAULT_TIME_LEFT_IN_YEARS: f64 = 7.0 / 365.0;
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.0;

// Zelen & Severo (Abramowitz–Stegun 26.2.17) coefficients.
const CND_P: f64 = 0.2316419;
const CND_A: [f64; 5] = [
    0.319381530,
    -0.356563782,
    1.781477937,
    -1.821255978,
    1.330274429,
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Greeks {
    pub delta: f64,
    pub price: f64,
}

/// Cumulative standard normal, polynomial approximation (abs error < 7.5e-8).
pub fn cnd(x: f64) -> f64 {
    if x < 0.0 {
        return 1.0 - cnd(-x);
    }
    let k = 1.0 / (1.0 + CND_P * x);
    let poly = k * (CND_A[0] + k * (CND_A[1] + k * (CND_A[2] + k * (CND_A[3] + k * CND_A[4]))));
    1.0 - (-x * x / 2.0).exp() / (2.0 * PI).sqrt() * poly
}

/// European option delta and price, no dividends.
///
/// Inputs are not validated: a zero spot, strike or `iv·√t` yields `NaN` or
/// infinite outputs.
pub fn black_scholes(
    is_put: bool,
    spot: f64,
    strike: f64,
    implied_vol: f64,
    time_left_in_years: f64,
    risk_free_rate: f64,
) -> Greeks {
    let vol_sqrt_t = implied_vol * time_left_in_years.sqrt();
    let d1 = ((spot / strike).ln()
        + (risk_free_rate + implied_vol * implied_vol / 2.0) * time_left_in_years)
        / vol_sqrt_t;
    let d2 = d1 - vol_sqrt_t;
    let discounted_strike = strike * (-risk_free_rate * time_left_in_years).exp();

    if is_put {
        Greeks {
            delta: cnd(d1) - 1.0,
            price: discounted_strike * cnd(-d2) - spot * cnd(-d1),
        }
    } else {
        Greeks {
            delta: cnd(d1),
            price: spot * cnd(d1) - discounted_strike * cnd(d2),
        }
    }
}

/// [`black_scholes`] with a one-week tenor and zero rates.
pub fn black_scholes_default(is_put: bool, spot: f64, strike: f64, implied_vol: f64) -> Greeks {
    black_scholes(
        is_put,
        spot,
        strike,
        implied_vol,
        DEFAULT_TIME_LEFT_IN_YEARS,
        DEFAULT_RISK_FREE_RATE,
    )
}
