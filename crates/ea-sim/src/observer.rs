//! Run-loop observer for progress reporting.

use ea_core::Tick;

/// Callbacks invoked by [`Conductor::run_with`][crate::Conductor::run_with]
/// between ticks.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
pub trait SimObserver {
    /// Called before each tick is attempted, including the one that ends up
    /// `Done`.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after each completed tick.  `unix_secs` is the simulated time
    /// reached.
    fn on_tick_end(&mut self, _tick: Tick, _unix_secs: i64) {}

    /// Called once, before `stop`, when the simulation reports `Done`.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
