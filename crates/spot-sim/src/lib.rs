//! Spot tick simulator
//!
//! Publishes simulated spot quotes for a set of instruments. Instruments are
//! grouped by their publish interval (rounded up to a granularity), each
//! group gets its own periodic trigger, and every firing advances the group's
//! quotes with a bounded random walk and broadcasts one tick per instrument.

// Application layer
pub mod application;

// Infrastructure layer
pub mod infrastructure;

// Cross-cutting concerns
pub mod error;
pub mod model;

// Re-export main types for convenience
pub use application::{SpotSimulator, effective_interval};
pub use error::{Result, SpotError};
pub use infrastructure::{
    BroadcastTickPublisher, ConfigError, CsvDefinitionSource, SimulatorConfig, parse_definitions,
};
