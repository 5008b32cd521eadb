//! Tick counter and the clock that maps it to Unix time.
//!
//! ```text
//! unix_secs(tick) = start_unix_secs + tick * tick_duration_secs
//! ```
//!
//! Every entity keeps its own copy of the current time and advances it by
//! one step per tick; the coordinator's `SimClock` is the reference they are
//! all checked against.  All timestamps are UTC seconds.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// Number of completed ticks.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The coordinator's tick counter together with its time base.
///
/// Only advanced after a tick completed; a failed tick leaves it untouched.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    pub start_unix_secs:    i64,
    pub tick_duration_secs: u32,
    pub current_tick:       Tick,
}

impl SimClock {
    pub fn new(start_unix_secs: i64, tick_duration_secs: u32) -> Self {
        Self { start_unix_secs, tick_duration_secs, current_tick: Tick::ZERO }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = self.current_tick + 1;
    }

    /// Unix time reached after `current_tick` completed ticks.
    #[inline]
    pub fn current_unix_secs(&self) -> i64 {
        self.unix_secs_at(self.current_tick)
    }

    #[inline]
    pub fn unix_secs_at(&self, tick: Tick) -> i64 {
        self.start_unix_secs + tick.0 as i64 * self.tick_duration_secs as i64
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically built in code or loaded from a JSON file by the application
/// crate and passed to the scenario builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Unix timestamp (UTC) for tick 0.
    pub start_unix_secs: i64,

    /// Seconds per tick.  Must be positive.
    pub tick_duration_secs: u32,

    /// Number of ticks to run before the coordinator signals termination.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results,
    /// whatever the worker count.
    pub seed: u64,

    /// Worker thread count of the execution pool.  `None` uses all logical
    /// cores.
    pub num_threads: Option<usize>,

    /// Execution contexts (lanes) per worker thread.  `0` means the default
    /// of 4.
    pub lanes_per_thread: usize,
}

impl SimConfig {
    pub const DEFAULT_LANES_PER_THREAD: usize = 4;

    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.start_unix_secs, self.tick_duration_secs)
    }

    /// Resolved number of pool workers.
    pub fn worker_count(&self) -> usize {
        self.num_threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Resolved number of execution contexts.
    pub fn lane_count(&self) -> usize {
        let per_thread = if self.lanes_per_thread == 0 {
            Self::DEFAULT_LANES_PER_THREAD
        } else {
            self.lanes_per_thread
        };
        self.worker_count() * per_thread
    }

    /// Reject configurations the coordinator cannot run.
    pub fn validate(&self) -> CoreResult<()> {
        if self.tick_duration_secs == 0 {
            return Err(CoreError::Config("tick_duration_secs must be positive".into()));
        }
        if self.num_threads == Some(0) {
            return Err(CoreError::Config("num_threads must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for SimConfig {
    /// One week at 10-minute resolution starting 2024-01-01T00:00:00Z.
    fn default() -> Self {
        Self {
            start_unix_secs:    1_704_067_200,
            tick_duration_secs: 600,
            total_ticks:        7 * 144,
            seed:               42,
            num_threads:        None,
            lanes_per_thread:   0,
        }
    }
}
