use dashmap::DashMap;
use spot_core::{PriceLimit, Quote, Symbol};
use std::collections::{BTreeMap, HashMap};

use crate::infrastructure::RegisteredInstrument;

/// Round a requested publish interval up to the scheduling granularity.
///
/// Non-positive requests fall back to the granularity itself; exact
/// multiples are kept as they are. A zero granularity is treated as 1ms.
pub fn effective_interval(raw_ms: i64, granularity_ms: u64) -> u64 {
    let granularity = granularity_ms.max(1);
    if raw_ms <= 0 {
        return granularity;
    }

    let raw = raw_ms as u64;
    raw.saturating_add((granularity - raw % granularity) % granularity)
}

/// Mutable quote of one scheduled instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveQuote {
    pub quote: Quote,
    pub interval_ms: u64,
}

/// Everything a session needs to publish: groups, live quotes and limits
#[derive(Debug, Default)]
pub struct FrequencyPlan {
    /// Effective interval -> symbols, in registry snapshot order
    pub groups: BTreeMap<u64, Vec<Symbol>>,
    pub quotes: DashMap<Symbol, LiveQuote>,
    pub limits: HashMap<Symbol, PriceLimit>,
}

impl FrequencyPlan {
    pub fn intervals(&self) -> Vec<u64> {
        self.groups.keys().copied().collect()
    }

    pub fn members(&self, interval_ms: u64) -> &[Symbol] {
        self.groups
            .get(&interval_ms)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every scheduled symbol with its effective interval
    pub fn scheduled(&self) -> Vec<(Symbol, u64)> {
        self.groups
            .iter()
            .flat_map(|(interval, symbols)| symbols.iter().map(move |s| (s.clone(), *interval)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Group registered instruments by effective interval and seed their quotes
/// from the nominal bid/ask.
pub fn build_groups(instruments: &[RegisteredInstrument], granularity_ms: u64) -> FrequencyPlan {
    let mut plan = FrequencyPlan::default();

    for instrument in instruments {
        let definition = &instrument.definition;
        let interval_ms = effective_interval(definition.publish_interval_ms, granularity_ms);

        plan.groups
            .entry(interval_ms)
            .or_default()
            .push(definition.symbol.clone());
        plan.quotes.insert(
            definition.symbol.clone(),
            LiveQuote {
                quote: Quote::from_bid_ask(definition.bid, definition.ask),
                interval_ms,
            },
        );
        plan.limits
            .insert(definition.symbol.clone(), instrument.limit);
    }

    plan
}
