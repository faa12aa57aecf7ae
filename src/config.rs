//! Pricer configuration
//!
//! Loaded from a TOML file; every field has a default so an empty file
//! (or no file at all) is a valid configuration.
//!
//! ```toml
//! risk_free_rate = 0.045
//! rate_source = "fixed"        # or "treasury" for the live 13-week T-bill yield
//! lookback = "1y"
//! trading_days_per_year = 252.0
//!
//! [yahoo]
//! timeout_secs = 15
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{PricingError, PricingResult};
use crate::data::{LookbackPeriod, YahooConfig, DEFAULT_RISK_FREE_RATE};
use crate::models::TRADING_DAYS_PER_YEAR;

/// Where the risk-free rate comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSourceKind {
    /// Use `risk_free_rate` as configured
    #[default]
    Fixed,
    /// 13-week Treasury bill yield from Yahoo
    Treasury,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricerConfig {
    /// Annual rate used when `rate_source` is fixed
    pub risk_free_rate: f64,
    pub rate_source: RateSourceKind,
    /// History window for volatility estimation
    pub lookback: LookbackPeriod,
    /// Annualization factor for daily volatility
    pub trading_days_per_year: f64,
    pub yahoo: YahooConfig,
}

impl Default for PricerConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            rate_source: RateSourceKind::Fixed,
            lookback: LookbackPeriod::OneYear,
            trading_days_per_year: TRADING_DAYS_PER_YEAR,
            yahoo: YahooConfig::default(),
        }
    }
}

impl PricerConfig {
    pub fn from_toml_str(text: &str) -> PricingResult<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|e| PricingError::config(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> PricingResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            PricingError::config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Self::from_toml_str(&text)
    }

    /// Defaults when no path is given, otherwise the file (which must exist)
    pub fn load(path: Option<&Path>) -> PricingResult<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> PricingResult<()> {
        if !self.risk_free_rate.is_finite() || self.risk_free_rate < 0.0 {
            return Err(PricingError::config(format!(
                "risk_free_rate must be finite and >= 0, got {}",
                self.risk_free_rate
            )));
        }
        if !self.trading_days_per_year.is_finite() || self.trading_days_per_year <= 0.0 {
            return Err(PricingError::config(format!(
                "trading_days_per_year must be > 0, got {}",
                self.trading_days_per_year
            )));
        }
        if self.yahoo.timeout_secs == 0 {
            return Err(PricingError::config("yahoo.timeout_secs must be > 0"));
        }
        Ok(())
    }
}
