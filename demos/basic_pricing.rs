//! Example: Black-Scholes pricing without network access
//!
//! Run with: cargo run --example basic_pricing

use bs_pricer::prelude::*;
use chrono::NaiveDate;

fn main() -> PricingResult<()> {
    // Option parameters
    let spot = 100.0;
    let strike = 100.0;
    let time = 1.0; // 1 year
    let rate = 0.045; // 4.5% risk-free rate
    let vol = 0.20; // 20% volatility

    println!("=== Black-Scholes Pricing ===\n");
    println!("Spot:     ${:.2}", spot);
    println!("Strike:   ${:.2}", strike);
    println!("Time:     {:.2} years", time);
    println!("Rate:     {:.1}%", rate * 100.0);
    println!("Vol:      {:.1}%\n", vol * 100.0);

    let call_price = black_scholes(spot, strike, time, rate, vol, OptionType::Call)?;
    let put_price = black_scholes(spot, strike, time, rate, vol, OptionType::Put)?;
    println!("Call Price: ${:.4}", call_price);
    println!("Put Price:  ${:.4}", put_price);

    // Verify put-call parity: C - P = S - K*e^(-rT)
    let parity_lhs = call_price - put_price;
    let parity_rhs = spot - strike * (-rate * time).exp();
    println!("\nPut-Call Parity Check:");
    println!("  C - P = {:.6}", parity_lhs);
    println!("  S - K*e^(-rT) = {:.6}", parity_rhs);

    // Historical volatility from a short series
    println!("\n=== Historical Volatility ===\n");
    let closes = [100.0, 102.0, 101.0, 105.0, 103.0];
    let hv = historical_volatility(&closes)?;
    println!("Closes {:?} -> {:.2}% annualized", closes, hv * 100.0);

    // Full session against an in-memory snapshot
    println!("\n=== Session (offline snapshot) ===\n");
    let expiry = NaiveDate::from_ymd_opt(2026, 6, 19).unwrap_or_default();
    let today = NaiveDate::from_ymd_opt(2025, 12, 19).unwrap_or_default();
    let market = StaticMarketData::new()
        .with_spot("DEMO", 103.0)
        .with_history("DEMO", closes.to_vec())
        .with_listing("DEMO", expiry, &[95.0, 100.0, 105.0]);
    let rates = FixedRate::default();
    let session = PricingSession::new(&market, &rates);

    let chain = session.chain("DEMO", expiry)?;
    let strike = chain.select_strike(OptionType::Call, 2)?;
    let request = PricingRequest::new("DEMO", expiry, strike, OptionType::Call);
    let report = session.price(&request, today)?;
    println!("{}", report);

    Ok(())
}
