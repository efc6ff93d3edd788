use clap::Parser;

use strike_model::config::FetchSettings;
use strike_model::model::OptionSide;
use strike_model::{fetch_data, schema, watch};

mod cli;
mod quote;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    match cli.command {
        cli::Command::Schema => schema::run(),
        cli::Command::Price {
            put,
            spot,
            strike,
            iv,
            days,
            rate,
        } => quote::price(put, spot, strike, iv, days, rate),
        cli::Command::Strike {
            asset,
            side,
            data_dir,
            reference,
        } => quote::strike(asset, side, &data_dir, reference),
        cli::Command::ModelIv {
            alt,
            side,
            reference,
            data_dir,
        } => quote::model_iv(alt, side, reference, &data_dir),
        cli::Command::FetchData {
            output_dir,
            assets,
            reference,
            days,
        } => {
            let settings = FetchSettings::from_cli(days, strike_model::config::DEFAULT_POLL_SECS)?;
            fetch_data::run(&output_dir, &assets, reference, &settings)
        }
        cli::Command::Watch {
            assets,
            side,
            reference,
            interval,
            days,
            once,
        } => watch::run(watch::WatchConfig {
            assets,
            sides: side.map_or_else(|| vec![OptionSide::Call, OptionSide::Put], |s| vec![s]),
            reference,
            once,
            settings: FetchSettings::from_cli(days, interval)?,
        }),
    }
}
