use thiserror::Error;

/// Errors raised inside a price-limit policy
///
/// Policies never surface these through [`crate::PriceLimitPolicy`]; they
/// collapse to "no limit" at the port boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    #[error("Non-positive input: {0}")]
    NonPositiveInput(String),

    #[error("Arithmetic overflow computing {0}")]
    Overflow(String),

    #[error("Price band too narrow: {0}")]
    DegenerateBand(String),
}

pub type PricingResult<T> = std::result::Result<T, PricingError>;
