//! Error types for the pricer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PricingError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
}

pub type PricingResult<T> = Result<T, PricingError>;

impl PricingError {
    pub fn insufficient_data(msg: impl Into<String>) -> Self {
        Self::InsufficientData(msg.into())
    }

    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn data_unavailable(msg: impl Into<String>) -> Self {
        Self::DataUnavailable(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Stable name of the error kind, used when reporting to the user
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InsufficientData(_) => "InsufficientDataError",
            Self::InvalidData(_) => "InvalidDataError",
            Self::InvalidInput(_) => "InvalidInputError",
            Self::DataUnavailable(_) => "DataUnavailableError",
            Self::Config(_) => "ConfigError",
            Self::Serialization(_) => "SerializationError",
            Self::IO(_) => "IOError",
        }
    }
}
