use clap::{Parser, Subcommand};
use std::path::PathBuf;

use strike_model::config::{DEFAULT_HISTORY_DAYS, DEFAULT_POLL_SECS};
use strike_model::model::{Asset, OptionSide};

/// Strike selection for weekly option vaults: Black-Scholes pricing,
/// 10-delta strike walks and modelled IVs for unlisted alts.
#[derive(Parser)]
#[command(name = "strike-model", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Output the JSON schema for strike selections
    Schema,

    /// Price one option with Black-Scholes
    Price {
        /// Price a put instead of a call
        #[arg(long)]
        put: bool,

        /// Spot price of the underlying
        #[arg(long)]
        spot: f64,

        /// Strike price
        #[arg(long)]
        strike: f64,

        /// Implied vol as a decimal (0.8 for 80%)
        #[arg(long)]
        iv: f64,

        /// Days to expiry
        #[arg(long, default_value = "7")]
        days: f64,

        /// Risk-free rate as a decimal
        #[arg(long, default_value = "0")]
        rate: f64,
    },

    /// Select the 10-delta strike from saved market data
    Strike {
        /// Asset to select a strike for (BTC, ETH, SOL, AVAX, NEAR, AAVE)
        #[arg(long)]
        asset: Asset,

        /// Option side: call or put
        #[arg(long, default_value = "call")]
        side: OptionSide,

        /// Directory containing options.csv, prices.csv and spots.csv
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Listed asset alts are modelled against
        #[arg(long, default_value = "ETH")]
        reference: Asset,
    },

    /// Print the modelled mark and bid IV for an unlisted asset
    ModelIv {
        /// Unlisted asset to model
        #[arg(long)]
        alt: Asset,

        /// Option side: call or put
        #[arg(long, default_value = "call")]
        side: OptionSide,

        /// Listed asset to regress against
        #[arg(long, default_value = "ETH")]
        reference: Asset,

        /// Directory containing options.csv, prices.csv and spots.csv
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },

    /// Fetch option chains, spots and price history into CSV files
    FetchData {
        /// Output directory for CSV files
        #[arg(long, default_value = "data")]
        output_dir: PathBuf,

        /// Comma-separated assets to fetch
        #[arg(long, value_delimiter = ',', default_value = "ETH")]
        assets: Vec<Asset>,

        /// Listed asset fetched alongside alts for modelling
        #[arg(long, default_value = "ETH")]
        reference: Asset,

        /// Number of days of price history to fetch
        #[arg(long, default_value_t = DEFAULT_HISTORY_DAYS)]
        days: u32,
    },

    /// Poll live markets and print 10-delta strikes on every refresh
    Watch {
        /// Comma-separated assets to watch
        #[arg(long, value_delimiter = ',', default_value = "ETH")]
        assets: Vec<Asset>,

        /// Only watch one side (default: both)
        #[arg(long)]
        side: Option<OptionSide>,

        /// Listed asset alts are modelled against
        #[arg(long, default_value = "ETH")]
        reference: Asset,

        /// Seconds between refreshes
        #[arg(long, default_value_t = DEFAULT_POLL_SECS)]
        interval: u64,

        /// Days of price history used for realized vols
        #[arg(long, default_value_t = DEFAULT_HISTORY_DAYS)]
        days: u32,

        /// Refresh once, print, then exit
        #[arg(long)]
        once: bool,
    },
}
