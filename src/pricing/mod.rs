//! Request orchestration

pub mod session;

pub use session::*;
