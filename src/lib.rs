//! # bs-pricer - Black-Scholes pricing with live market data
//!
//! Prices European calls and puts with the Black-Scholes closed form, using
//! the current spot, the listed option chain and historical volatility
//! fetched from a market data provider.
//!
//! ## Key Components
//!
//! - **Volatility Estimator**: annualized close-to-close volatility
//! - **Black-Scholes**: European call/put price with strict input checks
//! - **Data**: `MarketDataProvider` trait, Yahoo Finance client, in-memory snapshot
//! - **Session**: one request end to end (spot, T, r, σ, price)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bs_pricer::prelude::*;
//! use chrono::Utc;
//!
//! let yahoo = YahooClient::new().unwrap();
//! let rates = FixedRate::default();
//! let session = PricingSession::new(&yahoo, &rates);
//!
//! let expiry = *session.expirations("AAPL").unwrap().iter().next().unwrap();
//! let request = PricingRequest::new("AAPL", expiry, 200.0, OptionType::Call);
//! let report = session.price(&request, Utc::now().date_naive()).unwrap();
//! println!("{}", report);
//! ```
//!
//! ## What This Crate Does NOT Do
//!
//! - American early exercise
//! - Implied volatility solving
//! - Greeks or portfolio analytics
//! - Persist or cache market data

pub mod config;
pub mod core;
pub mod data;
pub mod models;
pub mod pricing;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        time_to_expiry, Expirations, OptionChain, OptionType, PriceResult, PriceSeries,
        PricingError, PricingInputs, PricingResult,
    };

    // Data
    pub use crate::data::{
        FixedRate, LookbackPeriod, MarketDataProvider, RiskFreeRateSource, SpotQuote,
        StaticMarketData, TreasuryBillRate, YahooClient, YahooConfig,
    };

    // Models
    pub use crate::models::{
        black_scholes, historical_volatility, norm_cdf, price as bs_price, VolatilityEstimator,
    };

    pub use crate::config::{PricerConfig, RateSourceKind};
    pub use crate::pricing::{PriceReport, PricingRequest, PricingSession};
}

// Re-export main types at crate root
pub use crate::core::{PricingError, PricingResult};
pub use crate::pricing::{PricingRequest, PricingSession};
