//! Spot Runner - demonstration harness for the spot tick simulator
//!
//! - **Sample**: the sample definitions file and inline definitions
//! - **Harness**: the timed Start -> Pause -> Resume -> Stop run
//!
//! ```text
//!   sample file ──► SpotSimulator ──► broadcast ──► tick handler
//!                        ▲                           (one task per tick)
//!                        │ start / pause / resume / stop
//!                     harness
//! ```

pub mod harness;
pub mod sample;

pub use harness::{DemoConfig, DemoReport, RunnerError, run_demo};
pub use sample::{SAMPLE_SYMBOL_COUNT, default_sample_path, inline_definitions, write_sample};
