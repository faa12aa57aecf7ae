//! Black-Scholes Model
//!
//! European option pricing from the closed form. Inputs are validated up
//! front; the formula itself is never clamped.

use statrs::function::erf::erfc;
use std::f64::consts::SQRT_2;

use crate::core::{OptionType, PriceResult, PricingInputs, PricingResult};

/// Standard normal CDF
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Black-Scholes d1 parameter
pub fn d1(inputs: &PricingInputs) -> f64 {
    let PricingInputs {
        spot,
        strike,
        time_to_expiry: time,
        risk_free_rate: rate,
        volatility: vol,
    } = *inputs;
    ((spot / strike).ln() + (rate + 0.5 * vol * vol) * time) / (vol * time.sqrt())
}

/// Black-Scholes d2 parameter
pub fn d2(inputs: &PricingInputs) -> f64 {
    d1(inputs) - inputs.volatility * inputs.time_to_expiry.sqrt()
}

/// Black-Scholes European option price.
///
/// Fails with `InvalidInput` if any input is outside its domain.
pub fn price(inputs: &PricingInputs, option_type: OptionType) -> PricingResult<PriceResult> {
    inputs.validate()?;

    let d1 = d1(inputs);
    let d2 = d2(inputs);
    let df = inputs.discount_factor();
    let spot = inputs.spot;
    let strike = inputs.strike;

    let price = match option_type {
        OptionType::Call => spot * norm_cdf(d1) - strike * df * norm_cdf(d2),
        OptionType::Put => strike * df * norm_cdf(-d2) - spot * norm_cdf(-d1),
    };

    Ok(PriceResult {
        price,
        option_type,
        inputs: *inputs,
    })
}

/// Price from the five scalars directly
pub fn black_scholes(
    spot: f64,
    strike: f64,
    time: f64,
    rate: f64,
    vol: f64,
    option_type: OptionType,
) -> PricingResult<f64> {
    let inputs = PricingInputs::new(spot, strike, time, rate, vol)?;
    Ok(price(&inputs, option_type)?.price)
}
