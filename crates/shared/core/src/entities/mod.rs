mod definition;
mod limit;
mod quote;
mod state;
mod tick;

pub use definition::InstrumentDefinition;
pub use limit::PriceLimit;
pub use quote::{Direction, PriceStep, Quote, QuoteSide};
pub use state::SimulatorState;
pub use tick::TickUpdate;
