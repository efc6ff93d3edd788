use crate::model::{OptionChain, OptionQuote};

/// How strikes missing between two listed strikes are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GapFill {
    /// Every missing strike gets `(lo + hi) / missing_steps` for each field,
    /// where `missing_steps = (hi.strike - lo.strike) / step`. This is the
    /// midpoint for a two-step gap and shrinks toward zero for wider gaps.
    /// The strike walker has always used this fill.
    #[default]
    PairSumOverGap,
    /// Strike-weighted linear interpolation between the bracketing quotes.
    Linear,
}

/// Fill gaps wider than one `step` with the walker's default fill.
pub fn linearly_interpolate_option_chain(chain: &OptionChain, step: f64) -> OptionChain {
    interpolate_option_chain(chain, step, GapFill::PairSumOverGap)
}

pub fn interpolate_option_chain(chain: &OptionChain, step: f64, fill: GapFill) -> OptionChain {
    let mut filled = chain.clone();
    if step.is_nan() || step <= 0.0 {
        return filled;
    }

    let quotes: Vec<&OptionQuote> = chain.quotes().collect();
    for pair in quotes.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        let missing_steps = (hi.strike_price - lo.strike_price) as f64 / step;

        let mut i = 1u64;
        while (i as f64) < missing_steps {
            let strike = lo.strike_price + (i as f64 * step).round() as u64;
            let quote = match fill {
                GapFill::PairSumOverGap => blend(lo, hi, strike, |a, b| (a + b) / missing_steps),
                GapFill::Linear => {
                    let w = i as f64 / missing_steps;
                    blend(lo, hi, strike, |a, b| a + (b - a) * w)
                }
            };
            filled.insert(quote);
            i += 1;
        }
    }

    filled
}

fn blend(
    lo: &OptionQuote,
    hi: &OptionQuote,
    strike: u64,
    f: impl Fn(f64, f64) -> f64,
) -> OptionQuote {
    OptionQuote {
        asset: lo.asset,
        strike_price: strike,
        delta: f(lo.delta, hi.delta),
        bid_price: f(lo.bid_price, hi.bid_price),
        bid_price_in_usd: f(lo.bid_price_in_usd, hi.bid_price_in_usd),
        bid_iv: f(lo.bid_iv, hi.bid_iv),
        mark_iv: f(lo.mark_iv, hi.mark_iv),
        mark_price: f(lo.mark_price, hi.mark_price),
    }
}
