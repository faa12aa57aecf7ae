//! Yahoo Finance data fetcher
//!
//! Spot quotes, option listings and daily price history from Yahoo
//! Finance's unofficial API.
//!
//! Note: This is for educational/research purposes. Yahoo Finance
//! data is delayed ~15 minutes and intended for personal use.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::provider::{LookbackPeriod, MarketDataProvider, RiskFreeRateSource};
use crate::core::{Expirations, OptionChain, PriceSeries, PricingError, PricingResult};

/// Endpoints and HTTP settings for the Yahoo client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YahooConfig {
    pub quote_url: String,
    pub options_url: String,
    pub chart_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            quote_url: "https://query1.finance.yahoo.com/v7/finance/quote".to_string(),
            options_url: "https://query1.finance.yahoo.com/v7/finance/options".to_string(),
            chart_url: "https://query1.finance.yahoo.com/v8/finance/chart".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            timeout_secs: 15,
        }
    }
}

/// Yahoo Finance API client
#[derive(Clone)]
pub struct YahooClient {
    client: reqwest::blocking::Client,
    config: YahooConfig,
}

impl YahooClient {
    pub fn new() -> PricingResult<Self> {
        Self::with_config(YahooConfig::default())
    }

    pub fn with_config(config: YahooConfig) -> PricingResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PricingError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// GET a JSON document, mapping every failure to `DataUnavailable`
    fn fetch<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> PricingResult<T> {
        tracing::debug!(url, ?query, "yahoo request");

        self.client
            .get(url)
            .query(query)
            .send()
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| {
                PricingError::data_unavailable(format!("Request to {} failed: {}", url, e))
            })?
            .json()
            .map_err(|e| {
                PricingError::data_unavailable(format!(
                    "Failed to parse response from {}: {}",
                    url, e
                ))
            })
    }

    /// Get current quote for a symbol
    pub fn get_quote(&self, symbol: &str) -> PricingResult<SpotQuote> {
        let response: YahooQuoteResponse =
            self.fetch(&self.config.quote_url, &[("symbols", symbol.to_string())])?;
        parse_quote(symbol, response)
    }

    /// Get available option expiration dates
    pub fn get_expirations(&self, symbol: &str) -> PricingResult<Expirations> {
        let url = format!("{}/{}", self.config.options_url, symbol);
        let response: YahooOptionsResponse = self.fetch(&url, &[])?;
        parse_expirations(symbol, response)
    }

    /// Get listed strikes for a specific expiration
    pub fn get_option_chain(&self, symbol: &str, expiry: NaiveDate) -> PricingResult<OptionChain> {
        let expiry_ts = expiry.and_time(NaiveTime::MIN).and_utc().timestamp();
        let url = format!("{}/{}", self.config.options_url, symbol);
        let response: YahooOptionsResponse =
            self.fetch(&url, &[("date", expiry_ts.to_string())])?;
        parse_option_chain(symbol, expiry, response)
    }

    /// Get daily closes over the lookback window
    pub fn get_daily_closes(
        &self,
        symbol: &str,
        lookback: LookbackPeriod,
    ) -> PricingResult<PriceSeries> {
        let url = format!("{}/{}", self.config.chart_url, symbol);
        let query = [
            ("range", lookback.as_range().to_string()),
            ("interval", "1d".to_string()),
        ];
        let response: YahooChartResponse = self.fetch(&url, &query)?;
        parse_chart(symbol, response)
    }
}

impl MarketDataProvider for YahooClient {
    fn get_spot_price(&self, ticker: &str) -> PricingResult<f64> {
        Ok(self.get_quote(ticker)?.price)
    }

    fn get_available_expirations(&self, ticker: &str) -> PricingResult<Expirations> {
        self.get_expirations(ticker)
    }

    fn get_option_chain(&self, ticker: &str, expiration: NaiveDate) -> PricingResult<OptionChain> {
        YahooClient::get_option_chain(self, ticker, expiration)
    }

    fn get_historical_prices(
        &self,
        ticker: &str,
        lookback: LookbackPeriod,
    ) -> PricingResult<PriceSeries> {
        self.get_daily_closes(ticker, lookback)
    }
}

/// Symbol of the 13-week T-bill yield index, quoted in percent
pub const TREASURY_BILL_SYMBOL: &str = "^IRX";

/// Live risk-free rate from the 13-week Treasury bill yield
#[derive(Clone)]
pub struct TreasuryBillRate {
    client: YahooClient,
}

impl TreasuryBillRate {
    pub fn new(client: YahooClient) -> Self {
        Self { client }
    }
}

impl RiskFreeRateSource for TreasuryBillRate {
    fn risk_free_rate(&self) -> PricingResult<f64> {
        let quote = self.client.get_quote(TREASURY_BILL_SYMBOL)?;
        let rate = quote.price / 100.0;
        tracing::info!(rate, "13-week T-bill yield");
        Ok(rate)
    }
}

/// Spot price quote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotQuote {
    pub symbol: String,
    pub price: f64,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

fn parse_quote(symbol: &str, response: YahooQuoteResponse) -> PricingResult<SpotQuote> {
    let result = response
        .quote_response
        .result
        .into_iter()
        .next()
        .ok_or_else(|| {
            PricingError::data_unavailable(format!("No quote data returned for {}", symbol))
        })?;

    let price = result
        .regular_market_price
        .filter(|p| p.is_finite() && *p > 0.0)
        .ok_or_else(|| {
            PricingError::data_unavailable(format!("No price data available for {}", symbol))
        })?;

    Ok(SpotQuote {
        symbol: symbol.to_string(),
        price,
        bid: result.bid,
        ask: result.ask,
        timestamp: Utc::now(),
    })
}

fn first_chain(
    symbol: &str,
    response: YahooOptionsResponse,
) -> PricingResult<YahooOptionChainData> {
    response
        .option_chain
        .result
        .into_iter()
        .next()
        .ok_or_else(|| {
            PricingError::data_unavailable(format!("No options data available for {}", symbol))
        })
}

fn parse_expirations(symbol: &str, response: YahooOptionsResponse) -> PricingResult<Expirations> {
    let chain = first_chain(symbol, response)?;

    let expiries: Vec<NaiveDate> = chain
        .expiration_dates
        .iter()
        .filter_map(|&ts| DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive()))
        .collect();

    if expiries.is_empty() {
        return Err(PricingError::data_unavailable(format!(
            "No options data available for {}",
            symbol
        )));
    }

    Ok(Expirations::new(expiries))
}

fn parse_option_chain(
    symbol: &str,
    expiry: NaiveDate,
    response: YahooOptionsResponse,
) -> PricingResult<OptionChain> {
    let data = first_chain(symbol, response)?;
    let mut chain = OptionChain::new(symbol, expiry);

    if let Some(options) = data.options.first() {
        for strike in options.calls.iter().filter_map(|c| c.strike) {
            chain.add_call(strike);
        }
        for strike in options.puts.iter().filter_map(|p| p.strike) {
            chain.add_put(strike);
        }
    }

    if chain.is_empty() {
        return Err(PricingError::data_unavailable(format!(
            "No strikes listed for {} expiring {}",
            symbol, expiry
        )));
    }

    tracing::debug!(
        symbol,
        %expiry,
        calls = chain.call_strikes.len(),
        puts = chain.put_strikes.len(),
        "parsed option chain"
    );
    Ok(chain)
}

fn parse_chart(symbol: &str, response: YahooChartResponse) -> PricingResult<PriceSeries> {
    if let Some(err) = response.chart.error {
        return Err(PricingError::data_unavailable(format!(
            "Chart request for {} failed: {}",
            symbol,
            err.description.unwrap_or(err.code)
        )));
    }

    let result = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| {
            PricingError::data_unavailable(format!("No historical data found for {}", symbol))
        })?;

    // Prefer dividend/split adjusted closes
    let raw = result
        .indicators
        .adjclose
        .and_then(|a| a.into_iter().next())
        .map(|a| a.adjclose)
        .or_else(|| result.indicators.quote.into_iter().next().map(|q| q.close))
        .unwrap_or_default();

    // Yahoo reports null for sessions without a print
    let closes: Vec<f64> = raw.into_iter().flatten().collect();
    if closes.is_empty() {
        return Err(PricingError::data_unavailable(format!(
            "No historical data found for {}",
            symbol
        )));
    }

    tracing::debug!(symbol, closes = closes.len(), "parsed price history");
    PriceSeries::new(closes)
}

// Yahoo Finance API response structures

#[derive(Debug, Deserialize)]
struct YahooQuoteResponse {
    #[serde(rename = "quoteResponse")]
    quote_response: YahooQuoteResult,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteResult {
    result: Vec<YahooQuoteData>,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteData {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
    bid: Option<f64>,
    ask: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionsResponse {
    #[serde(rename = "optionChain")]
    option_chain: YahooOptionChain,
}

#[derive(Debug, Deserialize)]
struct YahooOptionChain {
    result: Vec<YahooOptionChainData>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionChainData {
    #[serde(rename = "expirationDates", default)]
    expiration_dates: Vec<i64>,
    #[serde(default)]
    options: Vec<YahooOptions>,
}

#[derive(Debug, Deserialize)]
struct YahooOptions {
    #[serde(default)]
    calls: Vec<YahooOptionData>,
    #[serde(default)]
    puts: Vec<YahooOptionData>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionData {
    strike: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooChartResult>>,
    error: Option<YahooChartError>,
}

#[derive(Debug, Deserialize)]
struct YahooChartError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YahooChartResult {
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
    adjclose: Option<Vec<YahooAdjClose>>,
}

#[derive(Debug, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct YahooAdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}
