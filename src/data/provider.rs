//! Market data collaborators
//!
//! The pricer consumes market data through these traits; the binary wires
//! the Yahoo implementation and tests use the in-memory one.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{Expirations, OptionChain, PriceSeries, PricingError, PricingResult};

/// Source of spot prices, option listings and price history
pub trait MarketDataProvider: Send + Sync {
    /// Current trading price of the underlying
    fn get_spot_price(&self, ticker: &str) -> PricingResult<f64>;

    /// Listed option expirations, ascending
    fn get_available_expirations(&self, ticker: &str) -> PricingResult<Expirations>;

    /// Call and put strikes listed for one expiration
    fn get_option_chain(&self, ticker: &str, expiration: NaiveDate)
        -> PricingResult<OptionChain>;

    /// Distinct strikes (either side) for one expiration, ascending
    fn get_available_strikes(
        &self,
        ticker: &str,
        expiration: NaiveDate,
    ) -> PricingResult<Vec<f64>> {
        Ok(self.get_option_chain(ticker, expiration)?.all_strikes())
    }

    /// Chronological closing prices over the lookback window
    fn get_historical_prices(
        &self,
        ticker: &str,
        lookback: LookbackPeriod,
    ) -> PricingResult<PriceSeries>;
}

/// Supplies the annual risk-free rate as a decimal
pub trait RiskFreeRateSource: Send + Sync {
    fn risk_free_rate(&self) -> PricingResult<f64>;
}

/// Default annual risk-free rate (4.5%)
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.045;

/// A configured, constant risk-free rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRate(pub f64);

impl Default for FixedRate {
    fn default() -> Self {
        Self(DEFAULT_RISK_FREE_RATE)
    }
}

impl RiskFreeRateSource for FixedRate {
    fn risk_free_rate(&self) -> PricingResult<f64> {
        Ok(self.0)
    }
}

/// History window for volatility estimation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LookbackPeriod {
    OneMonth,
    ThreeMonths,
    SixMonths,
    #[default]
    OneYear,
    TwoYears,
    FiveYears,
}

impl LookbackPeriod {
    /// Range code understood by Yahoo's chart endpoint
    pub fn as_range(&self) -> &'static str {
        match self {
            LookbackPeriod::OneMonth => "1mo",
            LookbackPeriod::ThreeMonths => "3mo",
            LookbackPeriod::SixMonths => "6mo",
            LookbackPeriod::OneYear => "1y",
            LookbackPeriod::TwoYears => "2y",
            LookbackPeriod::FiveYears => "5y",
        }
    }

    /// Approximate number of trading sessions in the window
    pub fn trading_days(&self) -> usize {
        match self {
            LookbackPeriod::OneMonth => 21,
            LookbackPeriod::ThreeMonths => 63,
            LookbackPeriod::SixMonths => 126,
            LookbackPeriod::OneYear => 252,
            LookbackPeriod::TwoYears => 504,
            LookbackPeriod::FiveYears => 1260,
        }
    }
}

impl fmt::Display for LookbackPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_range())
    }
}

impl FromStr for LookbackPeriod {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1mo" => Ok(LookbackPeriod::OneMonth),
            "3mo" => Ok(LookbackPeriod::ThreeMonths),
            "6mo" => Ok(LookbackPeriod::SixMonths),
            "1y" => Ok(LookbackPeriod::OneYear),
            "2y" => Ok(LookbackPeriod::TwoYears),
            "5y" => Ok(LookbackPeriod::FiveYears),
            other => Err(PricingError::invalid_input(format!(
                "unknown lookback period '{}' (expected 1mo, 3mo, 6mo, 1y, 2y or 5y)",
                other
            ))),
        }
    }
}

impl TryFrom<String> for LookbackPeriod {
    type Error = PricingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LookbackPeriod> for String {
    fn from(period: LookbackPeriod) -> Self {
        period.as_range().to_string()
    }
}
