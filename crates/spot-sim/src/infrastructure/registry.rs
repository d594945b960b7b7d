use crate::error::{Result, SpotError};
use dashmap::DashMap;
use spot_core::{InstrumentDefinition, PriceLimit, Symbol};
use spot_ports::PriceLimitPolicy;
use std::sync::Arc;

/// A definition together with the limit computed when it was accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredInstrument {
    pub definition: InstrumentDefinition,
    pub limit: PriceLimit,
}

impl RegisteredInstrument {
    pub fn symbol(&self) -> &str {
        &self.definition.symbol
    }
}

/// In-memory instrument registry keyed by symbol
///
/// Inserts and overwrites are atomic per symbol; there is no registry-wide
/// lock, so readers and writers on different symbols never contend.
pub struct InMemoryInstrumentRegistry {
    entries: Arc<DashMap<Symbol, RegisteredInstrument>>,
}

impl InMemoryInstrumentRegistry {
    pub fn new() -> Self {
        InMemoryInstrumentRegistry {
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Validate a definition, compute its limit and store it.
    ///
    /// Returns the definition that was replaced, if any. Nothing is stored
    /// when validation or the limit computation fails.
    pub fn register(
        &self,
        definition: InstrumentDefinition,
        policy: &dyn PriceLimitPolicy,
    ) -> Result<Option<InstrumentDefinition>> {
        definition
            .validate()
            .map_err(SpotError::InvalidDefinition)?;

        let limit = policy
            .compute_limit(definition.bid, definition.ask, definition.spread)
            .ok_or_else(|| SpotError::PriceLimitUnavailable(definition.symbol.clone()))?;

        let symbol = definition.symbol.clone();
        let previous = self
            .entries
            .insert(symbol, RegisteredInstrument { definition, limit })
            .map(|old| old.definition);

        Ok(previous)
    }

    /// Get a definition by symbol
    pub fn get(&self, symbol: &str) -> Result<InstrumentDefinition> {
        self.entries
            .get(symbol)
            .map(|entry| entry.definition.clone())
            .ok_or_else(|| SpotError::InstrumentNotFound(symbol.to_string()))
    }

    /// Registered symbols in map iteration order
    pub fn symbols(&self) -> Vec<Symbol> {
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Every registered instrument, sorted by symbol
    pub fn snapshot(&self) -> Vec<RegisteredInstrument> {
        let mut all: Vec<_> = self
            .entries
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        all.sort_by(|a, b| a.definition.symbol.cmp(&b.definition.symbol));
        all
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for InMemoryInstrumentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemoryInstrumentRegistry {
    fn clone(&self) -> Self {
        InMemoryInstrumentRegistry {
            entries: Arc::clone(&self.entries),
        }
    }
}
