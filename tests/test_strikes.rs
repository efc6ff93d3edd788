use strike_model::StrikeError;
use strike_model::model::{Asset, OptionChain, OptionQuote};
use strike_model::strikes::{
    strike_at_delta_from_chain, ten_delta_strike_from_chain, ten_delta_strike_with_bsm,
};

// ── Fixtures ────────────────────────────────────────────────────────

fn quote(strike: u64, delta: f64) -> OptionQuote {
    OptionQuote {
        asset: Asset::Eth,
        strike_price: strike,
        delta,
        bid_price: 0.01,
        bid_price_in_usd: 20.0,
        bid_iv: 60.0,
        mark_iv: 62.0,
        mark_price: 0.011,
    }
}

/// 21 call strikes 1500..=2500, deltas falling from 0.95 to 0.02.
fn call_chain() -> OptionChain {
    (0..21u64)
        .map(|i| quote(1500 + 50 * i, 0.95 - 0.0465 * i as f64))
        .collect()
}

/// Mirror image for puts: -0.02 at 1500 down to -0.95 at 2500.
fn put_chain() -> OptionChain {
    (0..21u64)
        .map(|i| quote(1500 + 50 * i, -0.95 + 0.0465 * (20 - i) as f64))
        .collect()
}

// ── Chain walk ──────────────────────────────────────────────────────

#[test]
fn test_call_walk_returns_strike_closest_to_ten_delta() {
    let chain = call_chain();
    let q = ten_delta_strike_from_chain(false, 2000.0, 50.0, &chain).unwrap();
    // 2400 sits at 0.113, 2450 at 0.0665.
    assert_eq!(q.strike_price, 2400);

    let best = chain
        .quotes()
        .min_by(|a, b| (a.delta - 0.1).abs().total_cmp(&(b.delta - 0.1).abs()))
        .unwrap();
    assert_eq!(best.strike_price, q.strike_price);
}

#[test]
fn test_call_walk_is_deterministic() {
    let chain = call_chain();
    let first = ten_delta_strike_from_chain(false, 2000.0, 50.0, &chain).unwrap();
    for _ in 0..10 {
        assert_eq!(ten_delta_strike_from_chain(false, 2000.0, 50.0, &chain).unwrap(), first);
    }
}

#[test]
fn test_put_walk_moves_down_from_spot() {
    let q = ten_delta_strike_from_chain(true, 2000.0, 50.0, &put_chain()).unwrap();
    // 1600 sits at -0.113, 1550 at -0.0665.
    assert_eq!(q.strike_price, 1600);
    assert!(q.delta < 0.0);
}

#[test]
fn test_missing_start_strike_is_incomplete_chain() {
    let chain: OptionChain = call_chain()
        .quotes()
        .filter(|q| q.strike_price < 2050)
        .cloned()
        .collect();
    let err = ten_delta_strike_from_chain(false, 2000.0, 50.0, &chain).unwrap_err();
    assert_eq!(err, StrikeError::OptionChainIncomplete { strike: 2100 });
}

#[test]
fn test_zero_spot_is_rejected() {
    let err = ten_delta_strike_from_chain(false, 0.0, 50.0, &call_chain()).unwrap_err();
    assert_eq!(err, StrikeError::SpotIsZero { asset: None });
}

#[test]
fn test_tie_goes_to_strike_nearer_spot() {
    let chain: OptionChain = [quote(2100, 0.75), quote(2150, 0.25), quote(2200, 0.1)]
        .into_iter()
        .collect();
    let q = strike_at_delta_from_chain(false, 2000.0, 50.0, &chain, 0.5).unwrap();
    assert_eq!(q.strike_price, 2100);
}

#[test]
fn test_gap_is_filled_with_pair_sum_over_gap() {
    // 2200 is unlisted; it is filled with (0.25 + 0.02) / 2 = 0.135.
    let chain: OptionChain = [quote(2100, 0.3), quote(2150, 0.25), quote(2250, 0.02)]
        .into_iter()
        .collect();
    let q = ten_delta_strike_from_chain(false, 2000.0, 50.0, &chain).unwrap();
    assert_eq!(q.strike_price, 2200);
    assert!((q.delta - 0.135).abs() < 1e-12);
}

// ── Model walk ──────────────────────────────────────────────────────

#[test]
fn test_model_walk_starts_one_step_out_and_lands_near_ten_delta() {
    let now = chrono::DateTime::parse_from_rfc3339("2024-01-10T12:00:00Z")
        .unwrap()
        .with_timezone(&chrono::Utc);
    let call = ten_delta_strike_with_bsm(false, 100.0, 1.0, 0.8, now).unwrap();
    let put = ten_delta_strike_with_bsm(true, 100.0, 1.0, 0.8, now).unwrap();
    assert!(call.strike > 101.0);
    assert!(put.strike < 99.0);
    assert!((call.delta - 0.1).abs() < 0.02);
    assert!((put.delta + 0.1).abs() < 0.02);
}
