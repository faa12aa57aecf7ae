//! Market data
//!
//! Handles:
//! - Provider and rate-source traits the pricing session consumes
//! - Yahoo Finance API (spot, option listings, price history, T-bill yield)
//! - In-memory snapshot for deterministic runs

pub mod provider;
pub mod yahoo;
pub mod memory;

pub use provider::*;
pub use yahoo::*;
pub use memory::*;
