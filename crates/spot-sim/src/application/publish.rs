use dashmap::DashMap;
use log::{debug, error, warn};
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use spot_core::{Direction, PriceLimit, PriceStep, QuoteSide, Symbol, TickUpdate};
use spot_ports::{PriceLimitPolicy, TickSink};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::task::JoinSet;

use super::grouping::{FrequencyPlan, LiveQuote};
use crate::error::{Result, SpotError};

/// Result of one trigger firing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleOutcome {
    pub published: usize,
    pub failed: usize,
}

/// Draw one random-walk step.
///
/// The side selector is drawn from `1..3`, so `QuoteSide::Both` is never
/// produced here.
pub fn draw_step<R: Rng>(rng: &mut R) -> PriceStep {
    let deviation = Decimal::from_f64(rng.r#gen::<f64>())
        .map(|d| d.round_dp(8))
        .unwrap_or(Decimal::ZERO);
    let side = QuoteSide::from_selector(rng.gen_range(1..3));
    let direction = Direction::from_flag(rng.gen_bool(0.5));

    PriceStep::new(deviation, side, direction)
}

/// Per-session publishing state shared by every trigger
///
/// Groups and limits are fixed when the session is built; only the live
/// quotes change, one entry at a time.
pub struct PublishCycle {
    groups: BTreeMap<u64, Vec<Symbol>>,
    quotes: DashMap<Symbol, LiveQuote>,
    limits: HashMap<Symbol, PriceLimit>,
    policy: Arc<dyn PriceLimitPolicy>,
    sink: Arc<dyn TickSink>,
}

impl PublishCycle {
    pub fn new(
        plan: FrequencyPlan,
        policy: Arc<dyn PriceLimitPolicy>,
        sink: Arc<dyn TickSink>,
    ) -> Self {
        let FrequencyPlan {
            groups,
            quotes,
            limits,
        } = plan;

        PublishCycle {
            groups,
            quotes,
            limits,
            policy,
            sink,
        }
    }

    pub fn intervals(&self) -> Vec<u64> {
        self.groups.keys().copied().collect()
    }

    /// Every scheduled symbol with its effective interval
    pub fn scheduled(&self) -> Vec<(Symbol, u64)> {
        self.groups
            .iter()
            .flat_map(|(interval, symbols)| symbols.iter().map(move |s| (s.clone(), *interval)))
            .collect()
    }

    pub fn live_quote(&self, symbol: &str) -> Option<LiveQuote> {
        self.quotes.get(symbol).map(|entry| *entry)
    }

    /// Advance one instrument with a fresh random step
    pub fn advance_one(&self, symbol: &str) -> Result<TickUpdate> {
        let step = draw_step(&mut rand::thread_rng());
        self.apply_step(symbol, &step)
    }

    /// Advance one instrument with a given step, store the new quote and
    /// publish it.
    pub fn apply_step(&self, symbol: &str, step: &PriceStep) -> Result<TickUpdate> {
        let limit = self
            .limits
            .get(symbol)
            .ok_or_else(|| SpotError::PriceLimitUnavailable(symbol.to_string()))?;

        let tick = {
            let mut live = self
                .quotes
                .get_mut(symbol)
                .ok_or_else(|| SpotError::QuoteUnavailable(symbol.to_string()))?;

            live.quote = self.policy.advance(live.quote, step, limit);
            TickUpdate::new(symbol, live.quote, live.interval_ms)
        };

        debug!("{}", tick);
        self.sink.publish(tick.clone());
        Ok(tick)
    }

    /// Advance every member of the `interval_ms` group concurrently.
    ///
    /// One task per instrument; a failure or panic in one task is logged and
    /// counted without affecting its siblings.
    pub async fn fire(self: &Arc<Self>, interval_ms: u64) -> CycleOutcome {
        let mut outcome = CycleOutcome::default();
        let Some(symbols) = self.groups.get(&interval_ms) else {
            return outcome;
        };

        let mut tasks = JoinSet::new();
        for symbol in symbols {
            let cycle = Arc::clone(self);
            let symbol = symbol.clone();
            tasks.spawn(async move { cycle.advance_one(&symbol) });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(_)) => outcome.published += 1,
                Ok(Err(e)) => {
                    outcome.failed += 1;
                    warn!("Tick update failed on {}ms group: {}", interval_ms, e);
                }
                Err(e) => {
                    outcome.failed += 1;
                    error!("Tick update task on {}ms group aborted: {}", interval_ms, e);
                }
            }
        }

        outcome
    }
}
