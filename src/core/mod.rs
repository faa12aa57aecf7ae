//! Core data types for the pricer
//!
//! Defines fundamental types:
//! - OptionType, OptionChain, Expirations: what can be priced
//! - PricingInputs / PriceResult: the formula's inputs and output
//! - PriceSeries: historical closes for volatility estimation

pub mod option;
pub mod inputs;
pub mod series;
pub mod error;

pub use option::*;
pub use inputs::*;
pub use series::*;
pub use error::*;
