//! The run loop.

use std::time::Instant;

use ea_actor::ExecutionPool;
use ea_core::Tick;
use tracing::{error, info, warn};

use crate::{NoopObserver, SimError, SimObserver, SimResult, Simulation, TickOutcome};

/// What a completed run did.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    /// Ticks completed.
    pub ticks:       u64,
    pub final_tick:  Tick,
    /// Simulated time reached.
    pub unix_secs:   i64,
    pub wall_secs:   f64,
}

/// Drives a [`Simulation`] to completion on its execution pool.
///
/// ```text
/// Running ──Continue──► Running
/// Running ──Done──────► Stopping ── stop() ──► Stopped (pool shut down)
/// Running ──Err───────► pool shut down, error returned, stop() not called
/// ```
pub struct Conductor<S> {
    sim:  S,
    pool: ExecutionPool,
}

impl<S: Simulation> Conductor<S> {
    pub fn new(sim: S, pool: ExecutionPool) -> Self {
        Self { sim, pool }
    }

    pub fn run(self) -> SimResult<RunSummary> {
        self.run_with(&mut NoopObserver)
    }

    /// Tick until `Done`, then call `stop` exactly once and shut the pool
    /// down.
    ///
    /// Any other failure ends the run without calling `stop`: the pool is
    /// shut down and the failure returned.
    pub fn run_with<O: SimObserver>(self, observer: &mut O) -> SimResult<RunSummary> {
        let Conductor { mut sim, pool } = self;
        let started = Instant::now();
        let first = sim.current_tick();
        info!(tick = %first, workers = pool.worker_count(), lanes = pool.lane_count(), "run started");

        loop {
            let tick = sim.current_tick();
            observer.on_tick_start(tick);
            match flatten(pool.block_on(sim.step())) {
                Ok(TickOutcome::Continue) => observer.on_tick_end(tick, sim.current_unix_secs()),
                Ok(TickOutcome::Done) => break,
                Err(e) => return abort(pool, e),
            }
        }

        let final_tick = sim.current_tick();
        observer.on_sim_end(final_tick);
        if let Err(e) = flatten(pool.block_on(sim.stop())) {
            return abort(pool, e);
        }
        pool.shutdown()?;

        let summary = RunSummary {
            ticks:      final_tick.0 - first.0,
            final_tick,
            unix_secs:  sim.current_unix_secs(),
            wall_secs:  started.elapsed().as_secs_f64(),
        };
        info!(ticks = summary.ticks, wall_secs = summary.wall_secs, "run complete");
        Ok(summary)
    }
}

fn flatten<T>(result: Result<SimResult<T>, ea_actor::ActorError>) -> SimResult<T> {
    result.map_err(SimError::from).and_then(|inner| inner)
}

fn abort<T>(pool: ExecutionPool, error: SimError) -> SimResult<T> {
    error!(%error, "run aborted");
    if let Err(e) = pool.shutdown() {
        warn!(error = %e, "execution pool did not shut down cleanly");
    }
    Err(error)
}
