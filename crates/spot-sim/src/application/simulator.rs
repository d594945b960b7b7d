use log::{info, warn};
use parking_lot::{Mutex, RwLock};
use spot_core::{InstrumentDefinition, Quote, SimulatorState, Symbol, TickUpdate};
use spot_ports::{DefinitionSource, PriceLimitPolicy, TickSink};
use spot_pricing::BandPricer;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::grouping::build_groups;
use super::publish::PublishCycle;
use super::scheduler::FrequencyScheduler;
use crate::error::{Result, SpotError};
use crate::infrastructure::{
    BroadcastTickPublisher, CsvDefinitionSource, InMemoryInstrumentRegistry, SimulatorConfig,
};

/// Groups, live quotes and triggers built by one `start`
struct Session {
    cycle: Arc<PublishCycle>,
    scheduler: FrequencyScheduler,
}

/// Spot tick simulator
///
/// Holds the instrument registry and, once started, one trigger per
/// distinct publish interval. Every firing advances the instruments of that
/// interval with a bounded random walk and broadcasts a [`TickUpdate`] per
/// instrument.
///
/// Registering a definition never touches a running session; changes are
/// picked up by the next [`SpotSimulator::start`].
pub struct SpotSimulator {
    config: SimulatorConfig,
    registry: InMemoryInstrumentRegistry,
    policy: Arc<dyn PriceLimitPolicy>,
    publisher: Arc<BroadcastTickPublisher>,
    state: RwLock<SimulatorState>,
    // Lock order: session, then state
    session: Mutex<Option<Session>>,
}

impl SpotSimulator {
    /// Create an empty simulator using the band pricer from `config`
    pub fn new(config: SimulatorConfig) -> Self {
        let policy = Arc::new(BandPricer::with_config(config.pricing.clone()));
        Self::with_policy(config, policy)
    }

    /// Create an empty simulator with a custom price-limit policy
    pub fn with_policy(config: SimulatorConfig, policy: Arc<dyn PriceLimitPolicy>) -> Self {
        info!(
            "Creating spot simulator (granularity={}ms, policy={})",
            config.granularity_ms,
            policy.name()
        );

        SpotSimulator {
            publisher: Arc::new(BroadcastTickPublisher::new(config.tick_channel_capacity)),
            config,
            registry: InMemoryInstrumentRegistry::new(),
            policy,
            state: RwLock::new(SimulatorState::NotSetUp),
            session: Mutex::new(None),
        }
    }

    /// Simulator with default configuration and no instruments
    pub fn empty() -> Self {
        Self::new(SimulatorConfig::default())
    }

    /// Simulator with default configuration seeded from `definitions`
    pub fn from_definitions(definitions: impl IntoIterator<Item = InstrumentDefinition>) -> Self {
        let simulator = Self::empty();
        for definition in definitions {
            simulator.add_definition(definition);
        }
        simulator
    }

    /// Simulator with default configuration seeded from a definitions file.
    ///
    /// An unreadable or malformed file leaves the simulator empty.
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        let simulator = Self::empty();
        simulator.load(&CsvDefinitionSource::new(path.as_ref()));
        simulator
    }

    /// Build a simulator from configuration: the definitions file first,
    /// then the inline instruments.
    pub fn from_config(config: SimulatorConfig) -> Result<Self> {
        config.validate()?;

        let definitions_path = config.definitions_path.clone();
        let inline = config.instruments.clone();
        let simulator = Self::new(config);

        if let Some(path) = definitions_path {
            simulator.load(&CsvDefinitionSource::new(path));
        }
        for definition in inline {
            simulator.add_definition(definition);
        }

        Ok(simulator)
    }

    /// Register every definition produced by `source`; returns how many
    /// were accepted.
    pub fn load(&self, source: &dyn DefinitionSource) -> usize {
        let definitions = source.definitions();
        let offered = definitions.len();
        let accepted = definitions
            .into_iter()
            .filter(|definition| self.try_add_definition(definition.clone()).is_ok())
            .count();

        info!(
            "Loaded {} of {} definitions from {}",
            accepted,
            offered,
            source.describe()
        );
        accepted
    }

    /// Register or replace an instrument. Rejections are logged, never
    /// returned.
    pub fn add_definition(&self, definition: InstrumentDefinition) {
        let _ = self.try_add_definition(definition);
    }

    fn try_add_definition(&self, definition: InstrumentDefinition) -> Result<()> {
        let symbol = definition.symbol.clone();

        match self.registry.register(definition, self.policy.as_ref()) {
            Ok(Some(previous)) => {
                warn!("Overwriting definition for {} (was: {})", symbol, previous);
            }
            Ok(None) => {
                info!("Added definition for {}", symbol);
            }
            Err(e) => {
                warn!("Rejected definition for {}: {}", symbol, e);
                return Err(e);
            }
        }

        let mut state = self.state.write();
        if *state == SimulatorState::NotSetUp {
            *state = SimulatorState::SetUp;
        }
        Ok(())
    }

    /// Rebuild groups from the registry and start one trigger per interval.
    ///
    /// Any running session is stopped first. Fails only when triggers are
    /// needed and there is no Tokio runtime to run them on.
    pub fn start(&self) -> Result<()> {
        let mut session = self.session.lock();

        if self.registry.is_empty() {
            warn!("No instrument definitions registered, nothing will be published");
        }

        self.teardown(&mut session);

        let plan = build_groups(&self.registry.snapshot(), self.config.granularity_ms);
        for (interval_ms, symbols) in &plan.groups {
            info!("Scheduled {} every {} ms", symbols.join(", "), interval_ms);
        }

        let sink: Arc<dyn TickSink> = self.publisher.clone();
        let cycle = Arc::new(PublishCycle::new(plan, Arc::clone(&self.policy), sink));
        let scheduler = FrequencyScheduler::start(Arc::clone(&cycle))?;

        if scheduler.is_empty() {
            return Ok(());
        }

        *session = Some(Session { cycle, scheduler });
        *self.state.write() = SimulatorState::Started;
        info!("Simulator {}", SimulatorState::Started);
        Ok(())
    }

    /// Hold every trigger; no-op when nothing is scheduled
    pub fn pause(&self) {
        let session = self.session.lock();
        if let Some(active) = session.as_ref() {
            active.scheduler.pause();
            *self.state.write() = SimulatorState::Paused;
            info!("Simulator {}", SimulatorState::Paused);
        }
    }

    /// Let every trigger fire again; no-op when nothing is scheduled
    pub fn resume(&self) {
        let session = self.session.lock();
        if let Some(active) = session.as_ref() {
            active.scheduler.resume();
            *self.state.write() = SimulatorState::Resumed;
            info!("Simulator {}", SimulatorState::Resumed);
        }
    }

    /// Tear down every trigger and discard live quotes. Idempotent.
    pub fn stop(&self) {
        let mut session = self.session.lock();
        self.teardown(&mut session);
    }

    fn teardown(&self, session: &mut Option<Session>) {
        if let Some(mut previous) = session.take() {
            previous.scheduler.stop();
            *self.state.write() = SimulatorState::Stopped;
            info!("Simulator {}", SimulatorState::Stopped);
        }
    }

    /// Registered symbols, in registry iteration order
    pub fn list_instruments(&self) -> Vec<Symbol> {
        self.registry.symbols()
    }

    pub fn get_definition(&self, symbol: &str) -> Result<InstrumentDefinition> {
        self.registry.get(symbol)
    }

    pub fn instrument_count(&self) -> usize {
        self.registry.len()
    }

    pub fn current_state(&self) -> SimulatorState {
        *self.state.read()
    }

    /// Symbols of the running session with their effective interval;
    /// empty when nothing is scheduled
    pub fn scheduled_groups(&self) -> Vec<(Symbol, u64)> {
        self.session
            .lock()
            .as_ref()
            .map(|active| active.cycle.scheduled())
            .unwrap_or_default()
    }

    pub fn trigger_count(&self) -> usize {
        self.session
            .lock()
            .as_ref()
            .map_or(0, |active| active.scheduler.len())
    }

    /// Current quote of a scheduled instrument
    pub fn live_quote(&self, symbol: &str) -> Result<Quote> {
        self.session
            .lock()
            .as_ref()
            .and_then(|active| active.cycle.live_quote(symbol))
            .map(|live| live.quote)
            .ok_or_else(|| SpotError::QuoteUnavailable(symbol.to_string()))
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Subscribe to every tick
    pub fn subscribe(&self) -> broadcast::Receiver<TickUpdate> {
        self.publisher.subscribe()
    }

    /// Subscribe to the ticks of one instrument
    pub fn subscribe_instrument(&self, symbol: &str) -> broadcast::Receiver<TickUpdate> {
        self.publisher.subscribe_instrument(symbol)
    }

    /// Run `handler` on its own task for every tick. Fails with
    /// [`SpotError::RuntimeUnavailable`] outside a Tokio runtime.
    pub fn on_tick<F, Fut>(&self, handler: F) -> Result<JoinHandle<()>>
    where
        F: Fn(TickUpdate) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.publisher.spawn_handler(handler)
    }
}

impl Default for SpotSimulator {
    fn default() -> Self {
        Self::empty()
    }
}
