use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a simulator instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SimulatorState {
    /// No instrument has been accepted yet
    #[default]
    NotSetUp,
    /// At least one instrument is registered, nothing scheduled
    SetUp,
    /// Triggers were created and are firing
    Started,
    /// Triggers exist but do not fire
    Paused,
    /// Triggers fire again after a pause
    Resumed,
    /// Triggers were torn down
    Stopped,
}

impl fmt::Display for SimulatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SimulatorState::NotSetUp => "NotSetUp",
            SimulatorState::SetUp => "SetUp",
            SimulatorState::Started => "Started",
            SimulatorState::Paused => "Paused",
            SimulatorState::Resumed => "Resumed",
            SimulatorState::Stopped => "Stopped",
        };
        f.write_str(name)
    }
}
