//! Strike selection and implied-volatility modelling for weekly option vaults.
//!
//! The numeric core (pricing, strike walks, regression, the alt-coin IV
//! model) is pure and builds without the `full` feature. Data loading,
//! network providers and the polling loop need `full`.

pub mod alt_iv;
pub mod error;
pub mod model;
pub mod pricing;
pub mod realized;
pub mod regression;
pub mod schema;
pub mod selector;
pub mod strikes;

#[cfg(feature = "full")]
pub mod config;
#[cfg(feature = "full")]
pub mod data;
#[cfg(feature = "full")]
pub mod fetch_data;
#[cfg(feature = "full")]
pub mod watch;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{Result, StrikeError};
