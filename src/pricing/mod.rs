pub mod black_scholes;
pub mod expiry;

pub use black_scholes::{Greeks, black_scholes, black_scholes_default, cnd};
pub use expiry::{next_weekly_expiry, years_until_next_expiry};
