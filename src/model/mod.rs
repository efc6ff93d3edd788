pub mod asset;
pub mod option;
pub mod snapshot;

pub use asset::{Asset, OptionSide};
pub use option::{AssetOptions, ModelIv, OptionChain, OptionQuote, StrikeData};
pub use snapshot::{MarketSnapshot, RealizedVols};
