use chrono::{DateTime, Utc};

use strike_model::StrikeError;
use strike_model::alt_iv::{
    VOL_CHARGE, compute_model_iv_for_alts, compute_model_iv_with_call_atmf,
};
use strike_model::model::{
    Asset, AssetOptions, MarketSnapshot, OptionChain, OptionQuote, OptionSide, RealizedVols,
};
use strike_model::selector::{QuoteSource, select_strike};

// ── Fixtures ────────────────────────────────────────────────────────

/// ETH calls 1500..=2500; mark IV climbs 2 vol points per 100 of strike.
fn eth_calls() -> OptionChain {
    (0..21u64)
        .map(|i| {
            let strike = 1500 + 50 * i;
            OptionQuote {
                asset: Asset::Eth,
                strike_price: strike,
                delta: 0.95 - 0.0465 * i as f64,
                bid_price: 0.01,
                bid_price_in_usd: 20.0,
                bid_iv: 60.0,
                mark_iv: 50.0 + 0.02 * (strike as f64 - 1500.0),
                mark_price: 0.011,
            }
        })
        .collect()
}

/// ETH puts 1500..=2500, deltas -0.02 down to -0.95; mark IV rises 2 vol
/// points per 100 of strike below 2500.
fn eth_puts() -> OptionChain {
    (0..21u64)
        .map(|i| {
            let strike = 1500 + 50 * i;
            OptionQuote {
                asset: Asset::Eth,
                strike_price: strike,
                delta: -0.95 + 0.0465 * (20 - i) as f64,
                bid_price: 0.01,
                bid_price_in_usd: 15.0,
                bid_iv: 75.0,
                mark_iv: 70.0 + 0.02 * (2500.0 - strike as f64),
                mark_price: 0.009,
            }
        })
        .collect()
}

fn eth_vols(len: usize) -> Vec<f64> {
    (0..len).map(|i| 0.5 + 0.01 * (i % 7) as f64).collect()
}

/// Alt vol = 0.1 + 1.2 * ETH vol.
fn alt_vols_from(reference: &[f64]) -> Vec<f64> {
    reference.iter().map(|v| 0.1 + 1.2 * v).collect()
}

fn options() -> AssetOptions {
    [(Asset::Eth, eth_calls())].into_iter().collect()
}

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-01-10T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

// ── Model IV ────────────────────────────────────────────────────────

#[test]
fn test_model_iv_follows_regression_and_skew() {
    let eth = eth_vols(60);
    let vols: RealizedVols = [(Asset::Eth, eth.clone()), (Asset::Sol, alt_vols_from(&eth))]
        .into_iter()
        .collect();

    let iv = compute_model_iv_for_alts(Asset::Eth, false, Asset::Sol, 2000.0, &options(), &vols)
        .unwrap();

    // ATMF walk stays at 2100 (mark 62), the 10-delta walk lands on 2400 (mark 68).
    let atmf = 62.0 * 1.2 + 0.1 * 100.0;
    let expected_mark = atmf * (68.0 / 62.0);
    assert!((iv.mark_iv - expected_mark).abs() < 1e-6, "mark {}", iv.mark_iv);
    assert!((iv.mark_iv - iv.bid_iv - VOL_CHARGE).abs() < 1e-9);
}

#[test]
fn test_unequal_vol_histories_use_only_the_overlap() {
    let eth = eth_vols(60);
    let alt = alt_vols_from(&eth[15..]);

    let long: RealizedVols = [(Asset::Eth, eth.clone()), (Asset::Sol, alt.clone())]
        .into_iter()
        .collect();
    let trimmed: RealizedVols = [(Asset::Eth, eth[15..].to_vec()), (Asset::Sol, alt.clone())]
        .into_iter()
        .collect();
    let mut noisy_head = eth.clone();
    noisy_head[..15].iter_mut().for_each(|v| *v = 3.0);
    let noisy: RealizedVols = [(Asset::Eth, noisy_head), (Asset::Sol, alt)]
        .into_iter()
        .collect();

    let a = compute_model_iv_for_alts(Asset::Eth, false, Asset::Sol, 2000.0, &options(), &long)
        .unwrap();
    let b = compute_model_iv_for_alts(Asset::Eth, false, Asset::Sol, 2000.0, &options(), &trimmed)
        .unwrap();
    let c = compute_model_iv_for_alts(Asset::Eth, false, Asset::Sol, 2000.0, &options(), &noisy)
        .unwrap();
    assert_eq!(a, b);
    assert_eq!(a, c);
}

#[test]
fn test_missing_inputs_are_reported() {
    let eth = eth_vols(60);
    let vols: RealizedVols = [(Asset::Eth, eth)].into_iter().collect();

    let err = compute_model_iv_for_alts(Asset::Eth, false, Asset::Sol, 2000.0, &options(), &vols)
        .unwrap_err();
    assert_eq!(err, StrikeError::MissingRealizedVols { asset: Asset::Sol });

    let err =
        compute_model_iv_for_alts(Asset::Btc, false, Asset::Sol, 40000.0, &options(), &vols)
            .unwrap_err();
    assert_eq!(err, StrikeError::MissingChain { asset: Asset::Btc });
}

// ── Selection ───────────────────────────────────────────────────────

fn snapshot() -> MarketSnapshot {
    let eth = eth_vols(60);
    MarketSnapshot {
        calls: options(),
        puts: AssetOptions::new(),
        spots: [(Asset::Eth, 2000.0), (Asset::Sol, 100.0)].into_iter().collect(),
        realized_vols: [(Asset::Eth, eth.clone()), (Asset::Sol, alt_vols_from(&eth))]
            .into_iter()
            .collect(),
    }
}

#[test]
fn test_listed_asset_is_selected_from_chain() {
    let s = select_strike(&snapshot(), Asset::Eth, OptionSide::Call, Asset::Eth, now()).unwrap();
    assert_eq!(s.source, QuoteSource::Chain);
    assert_eq!(s.strike, 2400.0);
    assert_eq!(s.price_usd, 20.0);
    assert_eq!(s.iv, 60.0);
}

#[test]
fn test_alt_is_selected_from_model_iv() {
    let snap = snapshot();
    let s = select_strike(&snap, Asset::Sol, OptionSide::Call, Asset::Eth, now()).unwrap();
    let model = compute_model_iv_for_alts(
        Asset::Eth,
        false,
        Asset::Sol,
        2000.0,
        &snap.calls,
        &snap.realized_vols,
    )
    .unwrap();

    assert_eq!(s.source, QuoteSource::Model);
    assert_eq!(s.iv, model.bid_iv);
    assert!(s.strike > 100.0);
    assert_eq!(s.strike % Asset::Sol.step(), 0.0);
    assert!((s.delta - 0.1).abs() < 0.06);
    assert!(s.price_usd > 0.0);
}

#[test]
fn test_selection_errors() {
    let snap = snapshot();
    let err = select_strike(&snap, Asset::Sol, OptionSide::Put, Asset::Eth, now()).unwrap_err();
    assert_eq!(err, StrikeError::MissingChain { asset: Asset::Eth });

    let err = select_strike(&snap, Asset::Avax, OptionSide::Call, Asset::Eth, now()).unwrap_err();
    assert_eq!(
        err,
        StrikeError::SpotIsZero {
            asset: Some(Asset::Avax)
        }
    );
}

// ── Put side ────────────────────────────────────────────────────────

fn snapshot_with_puts() -> MarketSnapshot {
    MarketSnapshot {
        puts: [(Asset::Eth, eth_puts())].into_iter().collect(),
        ..snapshot()
    }
}

#[test]
fn test_put_model_iv_uses_call_atmf_and_put_skew() {
    let snap = snapshot_with_puts();
    let iv = compute_model_iv_with_call_atmf(
        Asset::Eth,
        true,
        Asset::Sol,
        2000.0,
        &snap.calls,
        &snap.puts,
        &snap.realized_vols,
    )
    .unwrap();

    // ATMF from the call chain at 2100 (mark 62); put 10-delta lands on 1600 (mark 88).
    let expected_mark = (62.0 * 1.2 + 0.1 * 100.0) * (88.0 / 62.0);
    assert!((iv.mark_iv - expected_mark).abs() < 1e-6, "mark {}", iv.mark_iv);
    assert!((iv.bid_iv - (expected_mark - VOL_CHARGE)).abs() < 1e-6);
}

#[test]
fn test_put_model_iv_from_single_chain_set() {
    // Without the calls, the ATMF walk settles on the put quote at 2100 (mark 78).
    let snap = snapshot_with_puts();
    let iv = compute_model_iv_for_alts(
        Asset::Eth,
        true,
        Asset::Sol,
        2000.0,
        &snap.puts,
        &snap.realized_vols,
    )
    .unwrap();
    let expected_mark = (78.0 * 1.2 + 0.1 * 100.0) * (88.0 / 78.0);
    assert!((iv.mark_iv - expected_mark).abs() < 1e-6, "mark {}", iv.mark_iv);
}

#[test]
fn test_alt_put_is_selected_below_spot() {
    let snap = snapshot_with_puts();
    let s = select_strike(&snap, Asset::Sol, OptionSide::Put, Asset::Eth, now()).unwrap();

    let expected_bid = (62.0 * 1.2 + 0.1 * 100.0) * (88.0 / 62.0) - VOL_CHARGE;
    assert_eq!(s.source, QuoteSource::Model);
    assert_eq!(s.side, OptionSide::Put);
    assert!((s.iv - expected_bid).abs() < 1e-6);
    // At ~90% IV with 44 hours left: 95 sits near -0.20 delta, 90 near -0.05.
    assert_eq!(s.strike, 90.0);
    assert!(s.delta < 0.0 && s.delta > -0.1);
    assert!(s.price_usd > 0.0);
}

#[test]
fn test_listed_put_is_selected_from_chain() {
    let s = select_strike(&snapshot_with_puts(), Asset::Eth, OptionSide::Put, Asset::Eth, now())
        .unwrap();
    assert_eq!(s.source, QuoteSource::Chain);
    assert_eq!(s.strike, 1600.0);
    assert_eq!(s.price_usd, 15.0);
}

// ── Low vol surface ─────────────────────────────────────────────────

#[test]
fn test_bid_below_vol_charge_is_rejected() {
    // Flat 25% surface and identical vol histories: mark 25, bid -5.
    let calls: OptionChain = eth_calls()
        .quotes()
        .map(|q| OptionQuote {
            mark_iv: 25.0,
            ..q.clone()
        })
        .collect();
    let eth = eth_vols(60);
    let snap = MarketSnapshot {
        calls: [(Asset::Eth, calls)].into_iter().collect(),
        realized_vols: [(Asset::Eth, eth.clone()), (Asset::Sol, eth)]
            .into_iter()
            .collect(),
        ..snapshot()
    };

    let err = select_strike(&snap, Asset::Sol, OptionSide::Call, Asset::Eth, now()).unwrap_err();
    match err {
        StrikeError::InvalidVol { iv } => assert!((iv + 0.05).abs() < 1e-9, "iv {iv}"),
        other => panic!("expected InvalidVol, got {other:?}"),
    }
}
