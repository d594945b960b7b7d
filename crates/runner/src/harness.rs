//! Harness - drives one simulator through Start, Pause, Resume and Stop
//!
//! The run:
//! - Writes the sample definitions file (or uses inline definitions)
//! - Builds the simulator and removes the sample file again
//! - Logs every tick, deliberately stalling on one instrument
//! - Pauses, logs the scheduled groups, resumes and finally stops

use log::{info, warn};
use serde::{Deserialize, Serialize};
use spot_sim::model::{SimulatorState, Symbol};
use spot_sim::{ConfigError, SimulatorConfig, SpotError, SpotSimulator};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

use crate::sample::{default_sample_path, inline_definitions, write_sample};

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Simulator error: {0}")]
    Spot(#[from] SpotError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Demonstration run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Simulator settings; its definitions are replaced by the sample file
    /// when `use_sample_file` is set
    #[serde(default)]
    pub simulator: SimulatorConfig,

    #[serde(default = "default_use_sample_file")]
    pub use_sample_file: bool,

    /// Where to write the sample file (defaults to the temp directory)
    #[serde(default)]
    pub sample_path: Option<PathBuf>,

    #[serde(default = "default_pause_after_ms")]
    pub pause_after_ms: u64,

    #[serde(default = "default_resume_after_ms")]
    pub resume_after_ms: u64,

    #[serde(default = "default_stop_after_ms")]
    pub stop_after_ms: u64,

    /// Instrument whose tick handler stalls
    #[serde(default = "default_slow_instrument")]
    pub slow_instrument: Option<Symbol>,

    #[serde(default = "default_slow_delay_ms")]
    pub slow_delay_ms: u64,
}

fn default_use_sample_file() -> bool {
    true
}

fn default_pause_after_ms() -> u64 {
    5_000
}

fn default_resume_after_ms() -> u64 {
    10_000
}

fn default_stop_after_ms() -> u64 {
    5_000
}

fn default_slow_instrument() -> Option<Symbol> {
    Some("EURGBP3".to_string())
}

fn default_slow_delay_ms() -> u64 {
    5_000
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            simulator: SimulatorConfig::default(),
            use_sample_file: default_use_sample_file(),
            sample_path: None,
            pause_after_ms: default_pause_after_ms(),
            resume_after_ms: default_resume_after_ms(),
            stop_after_ms: default_stop_after_ms(),
            slow_instrument: default_slow_instrument(),
            slow_delay_ms: default_slow_delay_ms(),
        }
    }
}

impl DemoConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.simulator.validate()?;
        Ok(config)
    }
}

/// What the run observed
#[derive(Debug, Clone, Default)]
pub struct DemoReport {
    /// State after each lifecycle call, in order
    pub states: Vec<SimulatorState>,
    /// Groups logged while paused
    pub scheduled: Vec<(Symbol, u64)>,
    /// Ticks that reached the handler
    pub ticks_received: usize,
}

/// Build the simulator for a run, removing the sample file afterwards
fn build_simulator(config: &DemoConfig) -> Result<SpotSimulator, RunnerError> {
    let mut simulator_config = config.simulator.clone();

    if !config.use_sample_file {
        if simulator_config.instruments.is_empty() {
            simulator_config.instruments = inline_definitions();
        }
        return Ok(SpotSimulator::from_config(simulator_config)?);
    }

    let path = config.sample_path.clone().unwrap_or_else(default_sample_path);
    write_sample(&path)?;
    info!("Wrote sample definitions to {}", path.display());

    simulator_config.definitions_path = Some(path.clone());
    let simulator = SpotSimulator::from_config(simulator_config);

    if let Err(e) = std::fs::remove_file(&path) {
        warn!("Could not remove sample file {}: {}", path.display(), e);
    }

    Ok(simulator?)
}

/// Run the full demonstration timeline
pub async fn run_demo(config: DemoConfig) -> Result<DemoReport, RunnerError> {
    let simulator = build_simulator(&config)?;
    let mut report = DemoReport::default();

    let received = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&received);
    let slow_instrument = config.slow_instrument.clone();
    let slow_delay = Duration::from_millis(config.slow_delay_ms);

    let handler = simulator.on_tick(move |tick| {
        let counter = Arc::clone(&counter);
        let stall = slow_instrument.as_deref() == Some(tick.symbol.as_str());
        async move {
            counter.fetch_add(1, Ordering::Relaxed);
            if stall {
                info!("Blocking handler for {} for {:?}", tick.symbol, slow_delay);
                sleep(slow_delay).await;
            }
            info!("{} {}", tick, tick.timestamp.format("%H:%M:%S%.3f"));
        }
    })?;

    simulator.start()?;
    report.states.push(simulator.current_state());

    sleep(Duration::from_millis(config.pause_after_ms)).await;
    simulator.pause();
    report.states.push(simulator.current_state());
    report.scheduled = simulator.scheduled_groups();

    info!("PAUSED with state {}", simulator.current_state());
    info!("Currently registered pairs and frequency:");
    for (symbol, interval_ms) in &report.scheduled {
        info!("{} @ {}", symbol, interval_ms);
    }
    info!("Will resume in {} seconds", config.resume_after_ms / 1000);

    sleep(Duration::from_millis(config.resume_after_ms)).await;
    simulator.resume();
    report.states.push(simulator.current_state());
    info!("Stopping the application in {} seconds", config.stop_after_ms / 1000);

    sleep(Duration::from_millis(config.stop_after_ms)).await;
    info!("Stopping the application");
    simulator.stop();
    report.states.push(simulator.current_state());

    handler.abort();
    report.ticks_received = received.load(Ordering::Relaxed);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_config_defaults() {
        let config = DemoConfig::from_json("{}").unwrap();

        assert!(config.use_sample_file);
        assert_eq!(config.pause_after_ms, 5_000);
        assert_eq!(config.resume_after_ms, 10_000);
        assert_eq!(config.stop_after_ms, 5_000);
        assert_eq!(config.slow_instrument.as_deref(), Some("EURGBP3"));
        assert_eq!(config.simulator.granularity_ms, 100);
    }

    #[test]
    fn test_demo_config_overrides() {
        let config = DemoConfig::from_json(
            r#"{
                "use_sample_file": false,
                "pause_after_ms": 10,
                "slow_instrument": null,
                "simulator": { "granularity_ms": 10 }
            }"#,
        )
        .unwrap();

        assert!(!config.use_sample_file);
        assert_eq!(config.pause_after_ms, 10);
        assert!(config.slow_instrument.is_none());
        assert_eq!(config.simulator.granularity_ms, 10);
    }

    #[test]
    fn test_demo_config_rejects_invalid_simulator() {
        let err = DemoConfig::from_json(r#"{"simulator": {"granularity_ms": 0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
