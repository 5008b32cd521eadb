//! The phase coordinator.

use std::future::Future;

use chrono::{DateTime, Utc};
use ea_core::{SimClock, SimConfig, Tick};
use ea_model::{DwellingHandle, EnvironmentHandle, PersonHandle};
use ea_output::{LoggerHandle, Metadata};
use futures::future::try_join_all;
use tracing::{Instrument, debug, debug_span, info};

use crate::{SimError, SimResult};

/// Version recorded in the run metadata.
pub const MODEL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result of asking a simulation for one more tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// A tick ran and the clock advanced.
    Continue,
    /// The tick bound is reached; nothing ran.
    Done,
}

/// What the [`Conductor`](crate::Conductor) drives.
pub trait Simulation {
    /// Number of completed ticks.
    fn current_tick(&self) -> Tick;

    /// Simulated time reached.
    fn current_unix_secs(&self) -> i64;

    /// Attempt one tick.
    fn step(&mut self) -> impl Future<Output = SimResult<TickOutcome>>;

    /// Final hook: write results.  Called once, after `Done`.
    fn stop(&mut self) -> impl Future<Output = SimResult<()>>;
}

// ── CitySim ───────────────────────────────────────────────────────────────────

/// People, dwellings, the environment, and an optional logger, advanced
/// together one tick at a time.
///
/// Create via [`ScenarioBuilder`](crate::ScenarioBuilder).
pub struct CitySim {
    config:      SimConfig,
    clock:       SimClock,
    people:      Vec<PersonHandle>,
    dwellings:   Vec<DwellingHandle>,
    environment: EnvironmentHandle,
    logger:      Option<LoggerHandle>,
    /// Wall-clock time of the first tick.
    started:     Option<DateTime<Utc>>,
    stopped:     bool,
}

impl CitySim {
    pub fn new(
        config: SimConfig,
        people: Vec<PersonHandle>,
        dwellings: Vec<DwellingHandle>,
        environment: EnvironmentHandle,
        logger: Option<LoggerHandle>,
    ) -> Self {
        Self {
            clock: config.make_clock(),
            config,
            people,
            dwellings,
            environment,
            logger,
            started: None,
            stopped: false,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn people(&self) -> &[PersonHandle] {
        &self.people
    }

    pub fn dwellings(&self) -> &[DwellingHandle] {
        &self.dwellings
    }

    pub fn environment(&self) -> &EnvironmentHandle {
        &self.environment
    }

    pub fn logger(&self) -> Option<&LoggerHandle> {
        self.logger.as_ref()
    }

    /// Run the four phases of the next tick, or report `Done` without
    /// touching any entity once `total_ticks` ticks have completed.
    pub async fn tick(&mut self) -> SimResult<TickOutcome> {
        let tick = self.clock.current_tick;
        if tick >= self.config.end_tick() {
            debug!(%tick, "tick bound reached");
            return Ok(TickOutcome::Done);
        }
        if self.stopped {
            return Err(SimError::AlreadyStopped);
        }
        self.started.get_or_insert_with(Utc::now);

        let reached = self.clock.unix_secs_at(tick + 1);
        self.run_phases(reached)
            .instrument(debug_span!("tick", tick = tick.0))
            .await
            .map_err(|source| SimError::Tick { tick, source: Box::new(source) })?;

        self.clock.advance();
        Ok(TickOutcome::Continue)
    }

    async fn run_phases(&self, reached: i64) -> SimResult<()> {
        // ── Phase 1: occupants ────────────────────────────────────────────
        //
        // A person's step resolves only after its home applied the
        // enter/leave, so the occupant sets are final once this completes.
        try_join_all(self.people.iter().map(PersonHandle::step)).await?;
        debug!(people = self.people.len(), "occupant phase complete");

        // ── Phase 2: dwellings ────────────────────────────────────────────
        try_join_all(self.dwellings.iter().map(DwellingHandle::step)).await?;
        debug!(dwellings = self.dwellings.len(), "dwelling phase complete");

        // ── Phase 3: environment ──────────────────────────────────────────
        self.environment.step().await?;
        debug!("environment phase complete");

        // ── Phase 4: logging ──────────────────────────────────────────────
        if let Some(logger) = &self.logger {
            logger.step(reached).await?;
            debug!(unix_secs = reached, "logging phase complete");
        }
        Ok(())
    }

    /// Write the logger's results with the run metadata.  Succeeds at most
    /// once.
    pub async fn stop(&mut self) -> SimResult<()> {
        if self.stopped {
            return Err(SimError::AlreadyStopped);
        }
        self.stopped = true;
        let metadata = self.metadata(Utc::now());
        if let Some(logger) = &self.logger {
            logger.flush(metadata).await?;
        }
        info!(ticks = self.clock.current_tick.0, "simulation stopped");
        Ok(())
    }

    fn metadata(&self, end: DateTime<Utc>) -> Metadata {
        let start = self.started.unwrap_or(end);
        let duration = (end - start).num_milliseconds() as f64 / 1_000.0;
        [
            ("start_of_simulation", start.to_rfc3339()),
            ("end_of_simulation", end.to_rfc3339()),
            ("duration_of_simulation", format!("{duration:.3}s")),
            ("model_version", MODEL_VERSION.to_owned()),
            ("ticks", self.clock.current_tick.0.to_string()),
            ("time_step_secs", self.config.tick_duration_secs.to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect()
    }
}

impl Simulation for CitySim {
    fn current_tick(&self) -> Tick {
        self.clock.current_tick
    }

    fn current_unix_secs(&self) -> i64 {
        self.clock.current_unix_secs()
    }

    fn step(&mut self) -> impl Future<Output = SimResult<TickOutcome>> {
        self.tick()
    }

    fn stop(&mut self) -> impl Future<Output = SimResult<()>> {
        CitySim::stop(self)
    }
}
