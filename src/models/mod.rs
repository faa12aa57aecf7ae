//! Pricing models
//!
//! Implements:
//! - Black-Scholes (European closed form)
//! - Historical volatility (close-to-close estimator)

pub mod black_scholes;
pub mod volatility;

pub use black_scholes::*;
pub use volatility::*;
