use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::values::{Price, Symbol};

/// Nominal quote and publish frequency for one instrument.
///
/// Definitions are immutable: updating an instrument means registering a new
/// definition under the same symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentDefinition {
    pub symbol: Symbol,
    pub bid: Price,
    pub ask: Price,
    pub spread: Price,
    /// Requested publish interval; zero or negative means "use the default"
    pub publish_interval_ms: i64,
}

impl InstrumentDefinition {
    pub fn new(
        symbol: impl Into<Symbol>,
        bid: Price,
        ask: Price,
        spread: Price,
        publish_interval_ms: i64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            bid,
            ask,
            spread,
            publish_interval_ms,
        }
    }

    /// Check the acceptance invariant `bid > 0 && ask > 0 && spread > 0`.
    ///
    /// Returns a human readable reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        let mut problems = Vec::new();
        if self.bid <= Decimal::ZERO {
            problems.push(format!("bid {} is not positive", self.bid));
        }
        if self.ask <= Decimal::ZERO {
            problems.push(format!("ask {} is not positive", self.ask));
        }
        if self.spread <= Decimal::ZERO {
            problems.push(format!("spread {} is not positive", self.spread));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(format!("{}: {}", self.symbol, problems.join(", ")))
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

impl fmt::Display for InstrumentDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bid={} ask={} spread={} every {}ms",
            self.symbol, self.bid, self.ask, self.spread, self.publish_interval_ms
        )
    }
}
