//! In-memory market data
//!
//! Deterministic provider for tests, demos and offline runs. Tickers are
//! matched case-insensitively.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use super::provider::{LookbackPeriod, MarketDataProvider};
use crate::core::{Expirations, OptionChain, PriceSeries, PricingError, PricingResult};

#[derive(Debug, Clone, Default)]
struct TickerData {
    spot: Option<f64>,
    closes: Vec<f64>,
    chains: BTreeMap<NaiveDate, OptionChain>,
}

/// Static snapshot of spot, history and listings per ticker
#[derive(Debug, Clone, Default)]
pub struct StaticMarketData {
    tickers: HashMap<String, TickerData>,
}

impl StaticMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, ticker: &str) -> &mut TickerData {
        self.tickers.entry(normalize(ticker)).or_default()
    }

    fn lookup(&self, ticker: &str) -> PricingResult<&TickerData> {
        self.tickers
            .get(&normalize(ticker))
            .ok_or_else(|| PricingError::data_unavailable(format!("Unknown ticker {}", ticker)))
    }

    pub fn with_spot(mut self, ticker: &str, spot: f64) -> Self {
        self.entry(ticker).spot = Some(spot);
        self
    }

    /// Daily closes, oldest first
    pub fn with_history(mut self, ticker: &str, closes: Vec<f64>) -> Self {
        self.entry(ticker).closes = closes;
        self
    }

    /// List the same strikes on both sides for an expiry
    pub fn with_listing(mut self, ticker: &str, expiry: NaiveDate, strikes: &[f64]) -> Self {
        let mut chain = OptionChain::new(normalize(ticker), expiry);
        for &strike in strikes {
            chain.add_call(strike);
            chain.add_put(strike);
        }
        self.entry(ticker).chains.insert(expiry, chain);
        self
    }

    pub fn with_chain(mut self, chain: OptionChain) -> Self {
        let ticker = chain.underlying.clone();
        self.entry(&ticker).chains.insert(chain.expiry, chain);
        self
    }
}

fn normalize(ticker: &str) -> String {
    ticker.trim().to_ascii_uppercase()
}

impl MarketDataProvider for StaticMarketData {
    fn get_spot_price(&self, ticker: &str) -> PricingResult<f64> {
        self.lookup(ticker)?
            .spot
            .ok_or_else(|| {
                PricingError::data_unavailable(format!("No price data available for {}", ticker))
            })
    }

    fn get_available_expirations(&self, ticker: &str) -> PricingResult<Expirations> {
        let data = self.lookup(ticker)?;
        if data.chains.is_empty() {
            return Err(PricingError::data_unavailable(format!(
                "No options data available for {}",
                ticker
            )));
        }
        Ok(Expirations::new(data.chains.keys().copied().collect()))
    }

    fn get_option_chain(&self, ticker: &str, expiration: NaiveDate) -> PricingResult<OptionChain> {
        self.lookup(ticker)?
            .chains
            .get(&expiration)
            .cloned()
            .ok_or_else(|| {
                PricingError::data_unavailable(format!(
                    "No listing for {} expiring {}",
                    ticker, expiration
                ))
            })
    }

    /// Keeps the most recent `trading_days + 1` closes of the window
    fn get_historical_prices(
        &self,
        ticker: &str,
        lookback: LookbackPeriod,
    ) -> PricingResult<PriceSeries> {
        let closes = &self.lookup(ticker)?.closes;
        if closes.is_empty() {
            return Err(PricingError::data_unavailable(format!(
                "No historical data found for {}",
                ticker
            )));
        }
        let keep = lookback.trading_days() + 1;
        let start = closes.len().saturating_sub(keep);
        PriceSeries::new(closes[start..].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 20).unwrap()
    }

    fn provider() -> StaticMarketData {
        StaticMarketData::new()
            .with_spot("aapl", 190.0)
            .with_history("AAPL", vec![180.0, 182.0, 181.0, 185.0])
            .with_listing("AAPL", expiry(), &[185.0, 190.0, 195.0])
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let p = provider();
        assert_eq!(p.get_spot_price("AAPL").unwrap(), 190.0);
        assert_eq!(p.get_spot_price(" aapl ").unwrap(), 190.0);
    }

    #[test]
    fn test_unknown_ticker() {
        let p = provider();
        assert!(matches!(
            p.get_spot_price("MSFT"),
            Err(PricingError::DataUnavailable(_))
        ));
        assert!(matches!(
            p.get_available_expirations("MSFT"),
            Err(PricingError::DataUnavailable(_))
        ));
    }

    #[test]
    fn test_listings() {
        let p = provider();
        let exps = p.get_available_expirations("AAPL").unwrap();
        assert_eq!(exps.iter().copied().collect::<Vec<_>>(), vec![expiry()]);

        let strikes = p.get_available_strikes("AAPL", expiry()).unwrap();
        assert_eq!(strikes, vec![185.0, 190.0, 195.0]);

        let other = NaiveDate::from_ymd_opt(2025, 7, 18).unwrap();
        assert!(p.get_option_chain("AAPL", other).is_err());
    }

    #[test]
    fn test_history_window() {
        let closes: Vec<f64> = (1..=300).map(|i| 100.0 + i as f64).collect();
        let p = StaticMarketData::new().with_history("SPY", closes);

        let month = p.get_historical_prices("SPY", LookbackPeriod::OneMonth).unwrap();
        assert_eq!(month.len(), 22);
        assert_eq!(month.last(), 400.0);

        let five = p.get_historical_prices("SPY", LookbackPeriod::FiveYears).unwrap();
        assert_eq!(five.len(), 300);
    }
}
