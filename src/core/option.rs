//! Option contract definitions
//!
//! Option type, per-expiry strike listings and the calendar-day
//! time-to-expiry convention.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::{PricingError, PricingResult};

/// Calendar days per year used to convert days-to-expiry into years
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Intrinsic value at given spot
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OptionType::Call => "Call",
            OptionType::Put => "Put",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OptionType {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" | "c" => Ok(OptionType::Call),
            "put" | "p" => Ok(OptionType::Put),
            other => Err(PricingError::invalid_input(format!(
                "option type must be 'call' or 'put', got '{}'",
                other
            ))),
        }
    }
}

/// Time to expiry in years, calendar days over 365.
///
/// Fails with `InvalidInput` when the expiry is today or in the past.
pub fn time_to_expiry(expiry: NaiveDate, today: NaiveDate) -> PricingResult<f64> {
    let days = (expiry - today).num_days();
    if days <= 0 {
        return Err(PricingError::invalid_input(format!(
            "expiration {} must be after {}",
            expiry, today
        )));
    }
    Ok(days as f64 / DAYS_PER_YEAR)
}

/// Ordered option expiration dates for one underlying.
///
/// Iteration borrows the dates, so the sequence can be walked any number
/// of times.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<NaiveDate>", into = "Vec<NaiveDate>")]
pub struct Expirations {
    dates: Vec<NaiveDate>,
}

impl Expirations {
    /// Sorts and deduplicates the given dates
    pub fn new(mut dates: Vec<NaiveDate>) -> Self {
        dates.sort();
        dates.dedup();
        Self { dates }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NaiveDate> {
        self.dates.iter()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Select by 1-based position, as presented to the user
    pub fn select(&self, choice: usize) -> PricingResult<NaiveDate> {
        select_one_based(&self.dates, choice, "expiration")
    }
}

impl From<Vec<NaiveDate>> for Expirations {
    fn from(dates: Vec<NaiveDate>) -> Self {
        Self::new(dates)
    }
}

impl From<Expirations> for Vec<NaiveDate> {
    fn from(expirations: Expirations) -> Self {
        expirations.dates
    }
}

impl<'a> IntoIterator for &'a Expirations {
    type Item = &'a NaiveDate;
    type IntoIter = std::slice::Iter<'a, NaiveDate>;

    fn into_iter(self) -> Self::IntoIter {
        self.dates.iter()
    }
}

/// Strikes listed for a single expiry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionChain {
    /// Underlying symbol
    pub underlying: String,
    /// Expiration date
    pub expiry: NaiveDate,
    /// Strikes with a listed call, ascending
    pub call_strikes: Vec<f64>,
    /// Strikes with a listed put, ascending
    pub put_strikes: Vec<f64>,
}

impl OptionChain {
    pub fn new(underlying: impl Into<String>, expiry: NaiveDate) -> Self {
        Self {
            underlying: underlying.into(),
            expiry,
            call_strikes: Vec::new(),
            put_strikes: Vec::new(),
        }
    }

    pub fn add_call(&mut self, strike: f64) {
        insert_strike(&mut self.call_strikes, strike);
    }

    pub fn add_put(&mut self, strike: f64) {
        insert_strike(&mut self.put_strikes, strike);
    }

    /// Strikes listed for one side of the chain
    pub fn strikes(&self, option_type: OptionType) -> &[f64] {
        match option_type {
            OptionType::Call => &self.call_strikes,
            OptionType::Put => &self.put_strikes,
        }
    }

    /// Union of call and put strikes, ascending
    pub fn all_strikes(&self) -> Vec<f64> {
        let mut strikes = self.call_strikes.clone();
        for &strike in &self.put_strikes {
            insert_strike(&mut strikes, strike);
        }
        strikes
    }

    /// Select a strike of one side by 1-based position
    pub fn select_strike(&self, option_type: OptionType, choice: usize) -> PricingResult<f64> {
        select_one_based(self.strikes(option_type), choice, "strike")
    }

    pub fn is_empty(&self) -> bool {
        self.call_strikes.is_empty() && self.put_strikes.is_empty()
    }
}

fn insert_strike(strikes: &mut Vec<f64>, strike: f64) {
    if !strike.is_finite() {
        return;
    }
    if let Err(pos) = strikes.binary_search_by(|s| s.total_cmp(&strike)) {
        strikes.insert(pos, strike);
    }
}

fn select_one_based<T: Copy>(items: &[T], choice: usize, what: &str) -> PricingResult<T> {
    if choice == 0 || choice > items.len() {
        return Err(PricingError::invalid_input(format!(
            "{} choice {} is out of range 1..={}",
            what,
            choice,
            items.len()
        )));
    }
    Ok(items[choice - 1])
}
