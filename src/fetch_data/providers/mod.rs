pub mod coingecko;
pub mod deribit;

pub use coingecko::CoinGeckoProvider;
pub use deribit::DeribitProvider;
