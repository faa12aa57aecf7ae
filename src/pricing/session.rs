//! One pricing request end to end
//!
//! Pulls spot, rate and price history from the collaborators, derives T and
//! σ, and runs the Black-Scholes engine. Nothing is cached between calls.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::PricerConfig;
use crate::core::{
    time_to_expiry, Expirations, OptionChain, OptionType, PriceResult, PricingInputs,
    PricingResult,
};
use crate::data::{LookbackPeriod, MarketDataProvider, RiskFreeRateSource};
use crate::models::{black_scholes, VolatilityEstimator};

/// What to price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRequest {
    pub ticker: String,
    pub expiry: NaiveDate,
    pub strike: f64,
    pub option_type: OptionType,
}

impl PricingRequest {
    pub fn new(ticker: &str, expiry: NaiveDate, strike: f64, option_type: OptionType) -> Self {
        Self {
            ticker: ticker.trim().to_ascii_uppercase(),
            expiry,
            strike,
            option_type,
        }
    }
}

/// Priced option with the market data that went into it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceReport {
    pub ticker: String,
    pub expiry: NaiveDate,
    pub days_to_expiry: i64,
    /// Spot price at pricing time
    pub spot: f64,
    pub risk_free_rate: f64,
    /// Annualized historical volatility
    pub volatility: f64,
    pub lookback: LookbackPeriod,
    pub result: PriceResult,
}

impl PriceReport {
    pub fn price(&self) -> f64 {
        self.result.price
    }
}

impl fmt::Display for PriceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inputs = &self.result.inputs;
        writeln!(f, "Ticker: {}", self.ticker)?;
        writeln!(f, "Current Stock Price (S): ${:.2}", self.spot)?;
        writeln!(f, "Expiration Date: {} ({} days)", self.expiry, self.days_to_expiry)?;
        writeln!(f, "Time to Expiration (T): {:.4} years", inputs.time_to_expiry)?;
        writeln!(f, "Strike Price (K): ${:.2}", inputs.strike)?;
        writeln!(f, "Risk-Free Interest Rate (r): {:.2}%", self.risk_free_rate * 100.0)?;
        writeln!(
            f,
            "Historical Volatility (σ, {}): {:.2}%",
            self.lookback,
            self.volatility * 100.0
        )?;
        write!(
            f,
            "\n{} Option Price: ${:.2}",
            self.result.option_type, self.result.price
        )
    }
}

/// Prices requests against a market data provider and rate source
pub struct PricingSession<'a> {
    provider: &'a dyn MarketDataProvider,
    rates: &'a dyn RiskFreeRateSource,
    estimator: VolatilityEstimator,
    lookback: LookbackPeriod,
}

impl<'a> PricingSession<'a> {
    pub fn new(provider: &'a dyn MarketDataProvider, rates: &'a dyn RiskFreeRateSource) -> Self {
        Self {
            provider,
            rates,
            estimator: VolatilityEstimator::default(),
            lookback: LookbackPeriod::default(),
        }
    }

    /// Apply lookback and annualization from configuration
    pub fn configured(
        provider: &'a dyn MarketDataProvider,
        rates: &'a dyn RiskFreeRateSource,
        config: &PricerConfig,
    ) -> PricingResult<Self> {
        Ok(Self::new(provider, rates)
            .with_lookback(config.lookback)
            .with_estimator(VolatilityEstimator::new(config.trading_days_per_year)?))
    }

    pub fn with_lookback(mut self, lookback: LookbackPeriod) -> Self {
        self.lookback = lookback;
        self
    }

    pub fn with_estimator(mut self, estimator: VolatilityEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn expirations(&self, ticker: &str) -> PricingResult<Expirations> {
        self.provider.get_available_expirations(ticker)
    }

    pub fn chain(&self, ticker: &str, expiry: NaiveDate) -> PricingResult<OptionChain> {
        self.provider.get_option_chain(ticker, expiry)
    }

    /// Annualized volatility of the ticker over the session's lookback
    pub fn historical_volatility(&self, ticker: &str) -> PricingResult<f64> {
        let series = self.provider.get_historical_prices(ticker, self.lookback)?;
        tracing::debug!(
            ticker,
            closes = series.len(),
            lookback = %self.lookback,
            "price history"
        );
        self.estimator.estimate(&series)
    }

    /// Price one request as of `today`
    pub fn price(&self, request: &PricingRequest, today: NaiveDate) -> PricingResult<PriceReport> {
        let time = time_to_expiry(request.expiry, today)?;
        let spot = self.provider.get_spot_price(&request.ticker)?;
        let rate = self.rates.risk_free_rate()?;
        let vol = self.historical_volatility(&request.ticker)?;

        let inputs = PricingInputs::new(spot, request.strike, time, rate, vol)?;
        let result = black_scholes::price(&inputs, request.option_type)?;

        tracing::info!(
            ticker = %request.ticker,
            option_type = %request.option_type,
            spot,
            strike = request.strike,
            time,
            rate,
            vol,
            price = result.price,
            "priced option"
        );

        Ok(PriceReport {
            ticker: request.ticker.clone(),
            expiry: request.expiry,
            days_to_expiry: (request.expiry - today).num_days(),
            spot,
            risk_free_rate: rate,
            volatility: vol,
            lookback: self.lookback,
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PricingError;
    use crate::data::{FixedRate, StaticMarketData};
    use approx::assert_abs_diff_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn market() -> StaticMarketData {
        StaticMarketData::new()
            .with_spot("XYZ", 100.0)
            .with_history("XYZ", vec![100.0, 102.0, 101.0, 105.0, 103.0])
            .with_listing("XYZ", date(2026, 1, 16), &[95.0, 100.0, 105.0])
    }

    #[test]
    fn test_price_matches_engine() {
        let market = market();
        let rates = FixedRate(0.045);
        let session = PricingSession::new(&market, &rates);

        let today = date(2025, 1, 16);
        let request = PricingRequest::new("xyz", date(2026, 1, 16), 100.0, OptionType::Call);
        let report = session.price(&request, today).unwrap();

        let closes = [100.0, 102.0, 101.0, 105.0, 103.0];
        let vol = crate::models::historical_volatility(&closes).unwrap();
        let expected =
            black_scholes::black_scholes(100.0, 100.0, 1.0, 0.045, vol, OptionType::Call)
                .unwrap();

        assert_eq!(report.ticker, "XYZ");
        assert_eq!(report.days_to_expiry, 365);
        assert_abs_diff_eq!(report.price(), expected, epsilon = 1e-12);
        assert_eq!(report.result.inputs.volatility, vol);
    }

    #[test]
    fn test_report_carries_market_inputs() {
        let market = market();
        let rates = FixedRate(0.031);
        let session = PricingSession::new(&market, &rates).with_lookback(LookbackPeriod::OneMonth);

        let request = PricingRequest::new("XYZ", date(2026, 1, 16), 95.0, OptionType::Put);
        let report = session.price(&request, date(2025, 10, 1)).unwrap();
        let vol = session.historical_volatility("XYZ").unwrap();

        assert_eq!(report.spot, 100.0);
        assert_eq!(report.risk_free_rate, 0.031);
        assert_eq!(report.volatility, vol);
        assert_eq!(report.lookback, LookbackPeriod::OneMonth);
        assert_eq!(report.days_to_expiry, 107);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["spot"], 100.0);
        assert_eq!(json["risk_free_rate"], 0.031);
        assert_eq!(json["volatility"], vol);
        assert_eq!(json["lookback"], "1mo");

        let text = report.to_string();
        assert!(text.contains("Risk-Free Interest Rate (r): 3.10%"));
        assert!(text.contains(&format!("(σ, 1mo): {:.2}%", vol * 100.0)));
    }

    #[test]
    fn test_expired_request() {
        let market = market();
        let rates = FixedRate::default();
        let session = PricingSession::new(&market, &rates);

        let request = PricingRequest::new("XYZ", date(2026, 1, 16), 100.0, OptionType::Put);
        let err = session.price(&request, date(2026, 1, 16)).unwrap_err();
        assert!(matches!(err, PricingError::InvalidInput(_)));
    }

    #[test]
    fn test_unknown_ticker() {
        let market = market();
        let rates = FixedRate::default();
        let session = PricingSession::new(&market, &rates);

        let request = PricingRequest::new("ZZZ", date(2026, 1, 16), 100.0, OptionType::Put);
        let err = session.price(&request, date(2025, 6, 1)).unwrap_err();
        assert!(matches!(err, PricingError::DataUnavailable(_)));
    }

    #[test]
    fn test_report_display() {
        let market = market();
        let rates = FixedRate(0.045);
        let session = PricingSession::new(&market, &rates);

        let request = PricingRequest::new("XYZ", date(2026, 1, 16), 105.0, OptionType::Put);
        let report = session.price(&request, date(2025, 7, 20)).unwrap();
        let text = report.to_string();

        assert!(text.contains("Current Stock Price (S): $100.00"));
        assert!(text.contains("Risk-Free Interest Rate (r): 4.50%"));
        assert!(text.contains("Put Option Price: $"));
    }
}
