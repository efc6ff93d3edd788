use std::collections::BTreeMap;

use crate::model::{Asset, RealizedVols};

/// Log returns per realized-vol sample.
pub const REALIZED_VOL_WINDOW: usize = 30;
/// Daily closes, crypto trades every day.
pub const DAILY_PERIODS_PER_YEAR: f64 = 365.0;

pub fn log_returns(prices: &[f64]) -> Vec<f64> {
    prices.windows(2).map(|w| (w[1] / w[0]).ln()).collect()
}

/// Annualised sample standard deviation of log returns over each rolling
/// window of `window` returns, oldest first. Decimal units (0.65 = 65%).
pub fn rolling_realized_vol(prices: &[f64], window: usize, periods_per_year: f64) -> Vec<f64> {
    if window < 2 {
        return Vec::new();
    }
    let annualise = periods_per_year.sqrt();
    log_returns(prices)
        .windows(window)
        .map(|returns| sample_std(returns) * annualise)
        .collect()
}

/// Daily realized-vol series for every asset with a price history.
pub fn realized_vols_from_prices(histories: &BTreeMap<Asset, Vec<f64>>) -> RealizedVols {
    histories
        .iter()
        .map(|(asset, prices)| {
            (
                *asset,
                rolling_realized_vol(prices, REALIZED_VOL_WINDOW, DAILY_PERIODS_PER_YEAR),
            )
        })
        .collect()
}

fn sample_std(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    var.sqrt()
}
