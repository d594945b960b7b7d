//! Configuration loading for the spot simulator
//!
//! Supports JSON configuration files for:
//! - Publish interval granularity
//! - Tick channel sizing
//! - Price-limit policy parameters
//! - Instruments, either inline or from a definitions file

use serde::{Deserialize, Serialize};
use spot_core::InstrumentDefinition;
use spot_pricing::PricingConfig;
use std::path::{Path, PathBuf};

/// Default publish interval granularity in milliseconds
pub const DEFAULT_GRANULARITY_MS: u64 = 100;

/// Root configuration for the spot simulator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Publish intervals are rounded up to a multiple of this
    #[serde(default = "default_granularity_ms")]
    pub granularity_ms: u64,

    /// Buffered ticks per subscriber before it starts lagging
    #[serde(default = "default_tick_channel_capacity")]
    pub tick_channel_capacity: usize,

    /// Price-limit policy settings
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Comma-delimited definitions file loaded at construction
    #[serde(default)]
    pub definitions_path: Option<PathBuf>,

    /// Inline definitions, added after the file
    #[serde(default)]
    pub instruments: Vec<InstrumentDefinition>,
}

fn default_granularity_ms() -> u64 {
    DEFAULT_GRANULARITY_MS
}

fn default_tick_channel_capacity() -> usize {
    10_000
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            granularity_ms: default_granularity_ms(),
            tick_channel_capacity: default_tick_channel_capacity(),
            pricing: PricingConfig::default(),
            definitions_path: None,
            instruments: Vec::new(),
        }
    }
}

impl SimulatorConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Use a different granularity
    pub fn with_granularity(mut self, granularity_ms: u64) -> Self {
        self.granularity_ms = granularity_ms;
        self
    }

    /// Load definitions from a file at construction
    pub fn with_definitions_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.definitions_path = Some(path.into());
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.granularity_ms == 0 {
            return Err(ConfigError::Invalid(
                "granularity_ms must be greater than zero".to_string(),
            ));
        }
        if self.tick_channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "tick_channel_capacity must be greater than zero".to_string(),
            ));
        }
        self.pricing.validate().map_err(ConfigError::Invalid)
    }
}

/// Configuration errors
#[derive(Debug, Clone)]
pub enum ConfigError {
    Io { path: String, error: String },
    Parse(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, error } => {
                write!(f, "Failed to read config file '{}': {}", path, error)
            }
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Invalid(e) => write!(f, "Invalid config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_minimal_config() {
        let config = SimulatorConfig::from_json("{}").unwrap();

        assert_eq!(config.granularity_ms, 100);
        assert_eq!(config.tick_channel_capacity, 10_000);
        assert_eq!(config.pricing, PricingConfig::default());
        assert!(config.definitions_path.is_none());
        assert!(config.instruments.is_empty());
    }

    #[test]
    fn test_parse_inline_instruments() {
        let json = r#"{
            "granularity_ms": 50,
            "pricing": { "max_move": "0.02" },
            "instruments": [
                {
                    "symbol": "EURUSD",
                    "bid": "1.1234",
                    "ask": "1.1235",
                    "spread": "1.1236",
                    "publish_interval_ms": 500
                }
            ]
        }"#;

        let config = SimulatorConfig::from_json(json).unwrap();
        assert_eq!(config.granularity_ms, 50);
        assert_eq!(config.pricing.max_move, dec!(0.02));
        assert_eq!(config.instruments.len(), 1);
        assert_eq!(config.instruments[0].ask, dec!(1.1235));
    }

    #[test]
    fn test_zero_granularity_is_rejected() {
        let err = SimulatorConfig::from_json(r#"{"granularity_ms": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_bad_pricing_is_rejected() {
        let err = SimulatorConfig::from_json(r#"{"pricing": {"tick_size": "-1"}}"#).unwrap_err();
        assert!(err.to_string().contains("tick_size"));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = SimulatorConfig::from_json("{ granularity_ms: }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SimulatorConfig::from_file("/definitely/not/here.json").unwrap_err();
        match err {
            ConfigError::Io { path, .. } => assert!(path.ends_with("here.json")),
            other => panic!("unexpected error: {}", other),
        }
    }
}
