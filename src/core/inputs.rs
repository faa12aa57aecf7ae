//! Pricing inputs and results

use serde::{Deserialize, Serialize};

use super::error::{PricingError, PricingResult};
use super::option::OptionType;

/// The five scalars of the Black-Scholes formula
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingInputs {
    /// Spot price of the underlying (S)
    pub spot: f64,
    /// Strike price (K)
    pub strike: f64,
    /// Time to expiry in years (T)
    pub time_to_expiry: f64,
    /// Annual risk-free rate, continuously compounded (r)
    pub risk_free_rate: f64,
    /// Annualized volatility (σ)
    pub volatility: f64,
}

impl PricingInputs {
    /// Build validated inputs
    pub fn new(
        spot: f64,
        strike: f64,
        time_to_expiry: f64,
        risk_free_rate: f64,
        volatility: f64,
    ) -> PricingResult<Self> {
        let inputs = Self {
            spot,
            strike,
            time_to_expiry,
            risk_free_rate,
            volatility,
        };
        inputs.validate()?;
        Ok(inputs)
    }

    /// Check every field against its domain.
    ///
    /// S, K, T and σ must be finite and strictly positive, r finite and
    /// non-negative.
    pub fn validate(&self) -> PricingResult<()> {
        positive("spot", self.spot)?;
        positive("strike", self.strike)?;
        positive("time to expiry", self.time_to_expiry)?;
        positive("volatility", self.volatility)?;

        if !self.risk_free_rate.is_finite() || self.risk_free_rate < 0.0 {
            return Err(PricingError::invalid_input(format!(
                "risk-free rate must be finite and >= 0, got {}",
                self.risk_free_rate
            )));
        }
        Ok(())
    }

    /// Discount factor e^(-rT)
    pub fn discount_factor(&self) -> f64 {
        (-self.risk_free_rate * self.time_to_expiry).exp()
    }
}

fn positive(name: &str, value: f64) -> PricingResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PricingError::invalid_input(format!(
            "{} must be finite and > 0, got {}",
            name, value
        )))
    }
}

/// Theoretical price together with what produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceResult {
    pub price: f64,
    pub option_type: OptionType,
    pub inputs: PricingInputs,
}
