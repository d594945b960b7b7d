//! Spot Ports
//!
//! Port definitions (traits) for the spot tick simulator.
//! These define the boundaries between the simulator core and its
//! collaborators: the price-limit policy, the tick delivery mechanism and
//! the source of instrument definitions.

mod error;
mod pricing;
mod sink;
mod source;

pub use error::{PricingError, PricingResult};
pub use pricing::PriceLimitPolicy;
pub use sink::TickSink;
pub use source::DefinitionSource;
