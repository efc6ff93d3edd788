use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StrikeError};

/// `y = intercept + slope * x`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RegressionParams {
    pub intercept: f64,
    pub slope: f64,
}

/// Ordinary least squares of `values_y` on `values_x`.
///
/// Empty input gives a zero line. A constant `x` series divides by zero and
/// yields `NaN` parameters.
pub fn linear_regression(values_y: &[f64], values_x: &[f64]) -> Result<RegressionParams> {
    if values_y.len() != values_x.len() {
        return Err(StrikeError::LengthMismatch {
            left: values_y.len(),
            right: values_x.len(),
        });
    }
    if values_x.is_empty() {
        return Ok(RegressionParams::default());
    }

    let n = values_x.len() as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0.0, 0.0, 0.0, 0.0);
    for (&x, &y) in values_x.iter().zip(values_y) {
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / (n * sum_xx - sum_x * sum_x);
    let intercept = sum_y / n - slope * sum_x / n;
    Ok(RegressionParams { intercept, slope })
}

/// One regression per contiguous window of `window` samples, oldest first.
pub fn rolling_linear_regression(
    values_y: &[f64],
    values_x: &[f64],
    window: usize,
) -> Result<Vec<RegressionParams>> {
    if values_y.len() != values_x.len() {
        return Err(StrikeError::LengthMismatch {
            left: values_y.len(),
            right: values_x.len(),
        });
    }
    if window == 0 {
        return Err(StrikeError::InvalidWindow);
    }

    values_y
        .windows(window)
        .zip(values_x.windows(window))
        .map(|(ys, xs)| linear_regression(ys, xs))
        .collect()
}
