//! Historical volatility
//!
//! Close-to-close estimator: sample standard deviation of daily log
//! returns, annualized by the square root of trading days per year.

use serde::{Deserialize, Serialize};

use crate::core::{PriceSeries, PricingError, PricingResult};

/// Conventional number of trading days per year
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Annualized close-to-close volatility estimator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilityEstimator {
    /// Annualization factor (periods per year)
    pub trading_days_per_year: f64,
}

impl Default for VolatilityEstimator {
    fn default() -> Self {
        Self {
            trading_days_per_year: TRADING_DAYS_PER_YEAR,
        }
    }
}

impl VolatilityEstimator {
    pub fn new(trading_days_per_year: f64) -> PricingResult<Self> {
        if !(trading_days_per_year.is_finite() && trading_days_per_year > 0.0) {
            return Err(PricingError::invalid_input(format!(
                "trading days per year must be > 0, got {}",
                trading_days_per_year
            )));
        }
        Ok(Self {
            trading_days_per_year,
        })
    }

    /// Annualized volatility of the series.
    ///
    /// Two returns (three closes) are the minimum for an unbiased sample
    /// deviation. A flat series has no volatility to price with and is
    /// rejected as `InvalidData`.
    pub fn estimate(&self, series: &PriceSeries) -> PricingResult<f64> {
        let returns = series.log_returns();
        let n = returns.len();
        if n < 2 {
            return Err(PricingError::insufficient_data(format!(
                "need at least 2 log returns for a sample deviation, got {}",
                n
            )));
        }

        let mean = returns.iter().sum::<f64>() / n as f64;
        let sumsq_dev = returns
            .iter()
            .map(|r| {
                let dev = r - mean;
                dev * dev
            })
            .sum::<f64>();
        let std_dev = (sumsq_dev / (n - 1) as f64).sqrt();
        let vol = std_dev * self.trading_days_per_year.sqrt();

        if !(vol.is_finite() && vol > 0.0) {
            return Err(PricingError::invalid_data(format!(
                "series of {} prices has no measurable volatility",
                series.len()
            )));
        }
        Ok(vol)
    }

    /// Validate raw closes and estimate
    pub fn estimate_closes(&self, closes: &[f64]) -> PricingResult<f64> {
        let series = PriceSeries::new(closes.to_vec())?;
        self.estimate(&series)
    }
}

/// Annualized historical volatility with the 252-day convention
pub fn historical_volatility(closes: &[f64]) -> PricingResult<f64> {
    VolatilityEstimator::default().estimate_closes(closes)
}
