//! Implied vol for assets without a listed option market.
//!
//! The alt's realized vol is regressed on a reference asset's realized vol,
//! the reference's at-the-money-forward IV is pushed through that line, and
//! the reference's 10-delta skew is applied on top. Realized vols are
//! decimals and IVs are percent, hence the intercept scaling.

use crate::error::{Result, StrikeError};
use crate::model::{Asset, AssetOptions, ModelIv, RealizedVols};
use crate::regression::{RegressionParams, rolling_linear_regression};
use crate::strikes::{strike_at_delta_from_chain, ten_delta_strike_from_chain};

/// Samples per regression window.
pub const REGRESSION_WINDOW: usize = 30;
/// Vol points charged off the modelled mark IV to get a bid.
pub const VOL_CHARGE: f64 = 30.0;

const ATMF_DELTA: f64 = 0.5;

/// Returns the alt's modelled `[markIV, bidIV]`, in percent.
///
/// `options` feeds both walks. With a put chain set the ATMF walk still runs
/// with a call target and settles on the put quote at its starting strike;
/// use [`compute_model_iv_with_call_atmf`] when the call chains are at hand.
pub fn compute_model_iv_for_alts(
    ref_asset: Asset,
    is_put: bool,
    altcoin: Asset,
    ref_spot_price: f64,
    options: &AssetOptions,
    realized_vols: &RealizedVols,
) -> Result<ModelIv> {
    compute_model_iv_with_call_atmf(
        ref_asset,
        is_put,
        altcoin,
        ref_spot_price,
        options,
        options,
        realized_vols,
    )
}

/// Same model with the ATMF IV read from `calls` and the 10-delta IV from
/// `side_options`.
pub fn compute_model_iv_with_call_atmf(
    ref_asset: Asset,
    is_put: bool,
    altcoin: Asset,
    ref_spot_price: f64,
    calls: &AssetOptions,
    side_options: &AssetOptions,
    realized_vols: &RealizedVols,
) -> Result<ModelIv> {
    let missing = || StrikeError::MissingChain { asset: ref_asset };
    let call_chain = calls.chain(ref_asset).ok_or_else(missing)?;
    let side_chain = side_options.chain(ref_asset).ok_or_else(missing)?;
    let step = ref_asset.step();

    let atmf_iv =
        strike_at_delta_from_chain(false, ref_spot_price, step, call_chain, ATMF_DELTA)?.mark_iv;
    let iv_10d = ten_delta_strike_from_chain(is_put, ref_spot_price, step, side_chain)?.mark_iv;
    let skew = iv_10d / atmf_iv - 1.0;

    let ref_vols = realized_vols
        .get(ref_asset)
        .ok_or(StrikeError::MissingRealizedVols { asset: ref_asset })?;
    let alt_vols = realized_vols
        .get(altcoin)
        .ok_or(StrikeError::MissingRealizedVols { asset: altcoin })?;

    let params = latest_regression(alt_vols, ref_vols)?;

    let alt_atmf_iv = atmf_iv * params.slope + params.intercept * 100.0;
    let mark_iv = alt_atmf_iv * (1.0 + skew);
    Ok(ModelIv {
        mark_iv,
        bid_iv: mark_iv - VOL_CHARGE,
    })
}

/// Most recent window of the alt-on-reference regression. Both series are
/// cut to the common tail, and the newest sample of each is left out while
/// it is still settling.
pub fn latest_regression(alt_vols: &[f64], ref_vols: &[f64]) -> Result<RegressionParams> {
    let (alt, reference) = align_tails(alt_vols, ref_vols);
    let settled = alt.len().saturating_sub(1);

    rolling_linear_regression(&alt[..settled], &reference[..settled], REGRESSION_WINDOW)?
        .pop()
        .ok_or(StrikeError::InsufficientSamples {
            needed: REGRESSION_WINDOW + 1,
            have: alt.len(),
        })
}

/// Drop the oldest samples of the longer series so both end together.
pub fn align_tails<'a>(a: &'a [f64], b: &'a [f64]) -> (&'a [f64], &'a [f64]) {
    let len = a.len().min(b.len());
    (&a[a.len() - len..], &b[b.len() - len..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_tails_front_truncates() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [30.0, 40.0];
        let (x, y) = align_tails(&a, &b);
        assert_eq!(x, &[3.0, 4.0]);
        assert_eq!(y, &[30.0, 40.0]);
    }

    #[test]
    fn test_latest_regression_ignores_newest_sample() {
        // alt = 0.1 + 1.5 * ref except for an outlier in the newest sample.
        let reference: Vec<f64> = (0..40).map(|i| 0.5 + 0.01 * i as f64).collect();
        let mut alt: Vec<f64> = reference.iter().map(|r| 0.1 + 1.5 * r).collect();
        *alt.last_mut().unwrap() = 9.0;

        let p = latest_regression(&alt, &reference).unwrap();
        assert!((p.slope - 1.5).abs() < 1e-9);
        assert!((p.intercept - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_latest_regression_needs_a_full_window() {
        let series = vec![0.5; REGRESSION_WINDOW];
        let err = latest_regression(&series, &series).unwrap_err();
        assert_eq!(
            err,
            StrikeError::InsufficientSamples {
                needed: REGRESSION_WINDOW + 1,
                have: REGRESSION_WINDOW
            }
        );
    }
}
