pub mod config;
pub mod csv_source;
pub mod registry;
pub mod tick_publisher;

pub use config::{ConfigError, SimulatorConfig};
pub use csv_source::{CsvDefinitionSource, REQUIRED_COLUMNS, parse_definitions};
pub use registry::{InMemoryInstrumentRegistry, RegisteredInstrument};
pub use tick_publisher::BroadcastTickPublisher;
