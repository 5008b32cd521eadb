//! Time-heterogeneous Markov chains for occupant activity.
//!
//! A [`MarkovChain`] holds the transition probabilities of one time slot.  A
//! [`HeterogeneousMarkovChain`] selects a chain by day kind (weekday or
//! weekend) and local time of day, both evaluated at a fixed offset from UTC
//! (UTC itself unless set with [`HeterogeneousMarkovChain::with_utc_offset`]).

use std::collections::BTreeMap;
use std::fmt::Debug;

use chrono::{DateTime, Datelike, FixedOffset, Offset, Timelike, Utc, Weekday};

use crate::{ModelError, ModelResult};

/// Allowed deviation of a state's outgoing probabilities from 1.
const PROBABILITY_TOLERANCE: f64 = 0.001;

const SECONDS_PER_DAY: u32 = 86_400;

// ── MarkovChain ───────────────────────────────────────────────────────────────

/// Transition probabilities of a single time slot.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkovChain<S> {
    /// Outgoing transitions per state, in insertion order.
    transitions: BTreeMap<S, Vec<(S, f64)>>,
}

impl<S: Copy + Ord + Debug> MarkovChain<S> {
    /// Build a chain from `(from, to, probability)` triples.
    ///
    /// Fails if any state's outgoing probabilities do not sum to 1 or a
    /// probability lies outside `[0, 1]`.
    pub fn new(transitions: impl IntoIterator<Item = (S, S, f64)>) -> ModelResult<Self> {
        let mut by_state: BTreeMap<S, Vec<(S, f64)>> = BTreeMap::new();
        for (from, to, p) in transitions {
            if !(0.0..=1.0).contains(&p) {
                return Err(ModelError::InvalidChain(format!(
                    "probability {p} for {from:?} -> {to:?} is outside [0, 1]"
                )));
            }
            by_state.entry(from).or_default().push((to, p));
        }
        for (from, outgoing) in &by_state {
            let total: f64 = outgoing.iter().map(|(_, p)| p).sum();
            if (total - 1.0).abs() >= PROBABILITY_TOLERANCE {
                return Err(ModelError::InvalidChain(format!(
                    "outgoing probabilities of {from:?} sum to {total}"
                )));
            }
        }
        Ok(Self { transitions: by_state })
    }

    /// A chain that keeps every listed state where it is.
    pub fn stationary(states: impl IntoIterator<Item = S>) -> Self {
        Self {
            transitions: states.into_iter().map(|s| (s, vec![(s, 1.0)])).collect(),
        }
    }

    /// Pick the successor of `current` for a uniform draw in `[0, 1)`.
    ///
    /// Transitions are walked in insertion order; the first one whose
    /// cumulative probability exceeds `draw` wins.
    pub fn next(&self, current: S, draw: f64) -> ModelResult<S> {
        let outgoing = self.transitions.get(&current).ok_or_else(|| {
            ModelError::InvalidChain(format!("no transitions out of {current:?}"))
        })?;
        let mut cumulative = 0.0;
        for &(to, p) in outgoing {
            if draw < cumulative + p {
                return Ok(to);
            }
            cumulative += p;
        }
        Err(ModelError::InvalidChain(format!(
            "could not determine the successor of {current:?} for draw {draw}"
        )))
    }
}

// ── HeterogeneousMarkovChain ──────────────────────────────────────────────────

/// Which set of chains applies on a given day.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DayKind {
    /// Monday to Friday.
    Weekday,
    /// Saturday and Sunday.
    Weekend,
}

impl DayKind {
    pub fn of(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sat | Weekday::Sun => DayKind::Weekend,
            _ => DayKind::Weekday,
        }
    }
}

/// Weekday and weekend chains keyed by local seconds since midnight.
#[derive(Clone, Debug)]
pub struct HeterogeneousMarkovChain<S> {
    weekday: BTreeMap<u32, MarkovChain<S>>,
    weekend: BTreeMap<u32, MarkovChain<S>>,
    offset:  FixedOffset,
}

impl<S: Copy + Ord + Debug> HeterogeneousMarkovChain<S> {
    pub fn new(
        weekday: BTreeMap<u32, MarkovChain<S>>,
        weekend: BTreeMap<u32, MarkovChain<S>>,
    ) -> Self {
        Self { weekday, weekend, offset: utc() }
    }

    /// Build one slot every `step_secs` seconds of the day, for both day
    /// kinds, from `chain_at(day, seconds_since_midnight)`.
    pub fn from_fn<F>(step_secs: u32, mut chain_at: F) -> ModelResult<Self>
    where
        F: FnMut(DayKind, u32) -> ModelResult<MarkovChain<S>>,
    {
        if step_secs == 0 {
            return Err(ModelError::InvalidChain("time slot size must be positive".into()));
        }
        let mut weekday = BTreeMap::new();
        let mut weekend = BTreeMap::new();
        for secs in (0..SECONDS_PER_DAY).step_by(step_secs as usize) {
            weekday.insert(secs, chain_at(DayKind::Weekday, secs)?);
            weekend.insert(secs, chain_at(DayKind::Weekend, secs)?);
        }
        Ok(Self { weekday, weekend, offset: utc() })
    }

    /// Evaluate day kind and time of day at `offset` from UTC instead of in
    /// UTC.
    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn utc_offset(&self) -> FixedOffset {
        self.offset
    }

    /// The chain in effect at `unix_secs`.
    pub fn chain_at(&self, unix_secs: i64) -> ModelResult<&MarkovChain<S>> {
        let time = DateTime::from_timestamp(unix_secs, 0)
            .ok_or_else(|| ModelError::NoChainForTime(format!("timestamp {unix_secs}")))?
            .with_timezone(&self.offset);
        let slots = match DayKind::of(time.weekday()) {
            DayKind::Weekday => &self.weekday,
            DayKind::Weekend => &self.weekend,
        };
        slots
            .get(&time.num_seconds_from_midnight())
            .ok_or_else(|| ModelError::NoChainForTime(time.to_rfc3339()))
    }

    /// Advance `current` by one transition of the chain in effect at
    /// `unix_secs`.
    pub fn move_state(&self, current: S, unix_secs: i64, draw: f64) -> ModelResult<S> {
        self.chain_at(unix_secs)?.next(current, draw)
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}
