pub mod grouping;
pub mod publish;
pub mod scheduler;
pub mod simulator;

pub use grouping::{FrequencyPlan, LiveQuote, build_groups, effective_interval};
pub use publish::{CycleOutcome, PublishCycle, draw_step};
pub use scheduler::FrequencyScheduler;
pub use simulator::SpotSimulator;
