//! Spot Pricing
//!
//! Price-limit policies for the spot tick simulator.

mod band;

pub use band::{BandPricer, PricingConfig};

// Re-export the port for convenience
pub use spot_ports::PriceLimitPolicy;
