use crate::infrastructure::config::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpotError {
    #[error("Instrument not found: {0}")]
    InstrumentNotFound(String),

    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),

    #[error("Price limit unavailable for {0}")]
    PriceLimitUnavailable(String),

    #[error("Live quote unavailable for {0}")]
    QuoteUnavailable(String),

    #[error("No Tokio runtime available to schedule triggers")]
    RuntimeUnavailable,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, SpotError>;
