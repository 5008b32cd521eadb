//! `ea-sim` — tick coordination and the run loop.
//!
//! # Four-phase tick
//!
//! ```text
//! tick(t):
//!   t >= total_ticks ?          → Done, no entity touched
//!   ① Occupants    — every person steps; enter/leave reach the homes
//!   ② Dwellings    — every dwelling steps against this tick's occupancy
//!                    and this tick's outdoor temperature
//!   ③ Environment  — advance the outdoor temperature to tick t + 1
//!   ④ Logging      — sample every source at the timestamp of tick t + 1
//!   advance tick counter and clock → Continue
//! ```
//!
//! Every phase is a full barrier: all of its operations complete before the
//! next phase issues anything.  A failure anywhere aborts the tick and leaves
//! the counter where it was.
//!
//! # Run loop
//!
//! [`Conductor`] owns the [`ExecutionPool`](ea_actor::ExecutionPool) and a
//! [`Simulation`].  It drives ticks until `Done`, calls `stop` once, and shuts
//! the pool down.
//!
//! ```rust,ignore
//! let pool = ExecutionPool::new(PoolConfig::from_sim_config(&config))?;
//! let sim = ScenarioBuilder::new(config)
//!     .markov_chain(chain)
//!     .outdoor_temperature(series)
//!     .dwellings(dwellings)
//!     .people(people)
//!     .writer(Box::new(CsvWriter::new(dir)?))
//!     .build(&pool)?;
//! let summary = Conductor::new(sim, pool).run()?;
//! ```

pub mod builder;
pub mod conductor;
pub mod error;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::{DwellingSpec, LogSelection, PersonSpec, ScenarioBuilder};
pub use conductor::{Conductor, RunSummary};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{CitySim, Simulation, TickOutcome};
