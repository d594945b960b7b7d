use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Quote;
use crate::values::{Price, Symbol, Timestamp};

/// Price update emitted for one instrument on one trigger firing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickUpdate {
    pub symbol: Symbol,
    pub bid: Price,
    pub ask: Price,
    pub last: Price,
    /// Effective interval of the trigger that produced this tick
    pub interval_ms: u64,
    pub timestamp: Timestamp,
}

impl TickUpdate {
    /// Create a tick with explicit timestamp
    pub fn new_with_time(
        symbol: impl Into<Symbol>,
        quote: Quote,
        interval_ms: u64,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            bid: quote.bid,
            ask: quote.ask,
            last: quote.last,
            interval_ms,
            timestamp,
        }
    }

    /// Create a tick stamped with the current system time
    pub fn new(symbol: impl Into<Symbol>, quote: Quote, interval_ms: u64) -> Self {
        Self::new_with_time(symbol, quote, interval_ms, Utc::now())
    }

    pub fn quote(&self) -> Quote {
        Quote::new(self.bid, self.ask, self.last)
    }
}

impl fmt::Display for TickUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}, {}, {}", self.symbol, self.bid, self.ask, self.last)
    }
}
