//! Spot Core Domain
//!
//! Pure domain types for the spot tick simulator.
//! This crate contains no async, no I/O, and is 100% unit testable.
//!
//! The bounded random walk that drives every simulated tick lives here as
//! [`Quote::step`], so any price-limit policy can reuse it.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    Direction, InstrumentDefinition, PriceLimit, PriceStep, Quote, QuoteSide, SimulatorState,
    TickUpdate,
};
pub use values::{PRICE_DP, Price, Symbol, Timestamp, round_price};
