//! Historical closing prices

use serde::{Deserialize, Serialize};

use super::error::{PricingError, PricingResult};

/// Minimum number of closes needed to form a single log return
pub const MIN_SERIES_LEN: usize = 2;

/// Chronological closing prices, all finite and strictly positive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct PriceSeries {
    closes: Vec<f64>,
}

impl PriceSeries {
    /// Validate and wrap closes (oldest first)
    pub fn new(closes: Vec<f64>) -> PricingResult<Self> {
        if closes.len() < MIN_SERIES_LEN {
            return Err(PricingError::insufficient_data(format!(
                "need at least {} prices, got {}",
                MIN_SERIES_LEN,
                closes.len()
            )));
        }

        if let Some((idx, bad)) = closes
            .iter()
            .enumerate()
            .find(|(_, p)| !(p.is_finite() && **p > 0.0))
        {
            return Err(PricingError::invalid_data(format!(
                "price {} at index {} is not a positive finite number",
                bad, idx
            )));
        }

        Ok(Self { closes })
    }

    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Most recent close
    pub fn last(&self) -> f64 {
        self.closes[self.closes.len() - 1]
    }

    /// Consecutive log returns ln(p[i] / p[i-1])
    pub fn log_returns(&self) -> Vec<f64> {
        self.closes
            .windows(2)
            .map(|w| (w[1] / w[0]).ln())
            .collect()
    }
}

impl TryFrom<Vec<f64>> for PriceSeries {
    type Error = PricingError;

    fn try_from(closes: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(closes)
    }
}

impl From<PriceSeries> for Vec<f64> {
    fn from(series: PriceSeries) -> Self {
        series.closes
    }
}
