// Re-export domain types from spot-core so callers only need this crate
pub use spot_core::{
    Direction, InstrumentDefinition, PRICE_DP, Price, PriceLimit, PriceStep, Quote, QuoteSide,
    SimulatorState, Symbol, TickUpdate, Timestamp, round_price,
};

// Re-export ports and the default policy
pub use spot_ports::{DefinitionSource, PriceLimitPolicy, TickSink};
pub use spot_pricing::{BandPricer, PricingConfig};
