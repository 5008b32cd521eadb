//! Occupants and their activity.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use ea_actor::{Actor, Pending, PoolHandle};
use ea_core::{EntityKey, EntityRng, PersonId};
use tracing::trace;

use crate::{DwellingHandle, HeterogeneousMarkovChain, ModelResult};

// ── Activity ──────────────────────────────────────────────────────────────────

/// What a person is doing during one time step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Activity {
    Home,
    SleepAtHome,
    NotAtHome,
}

impl Activity {
    pub const ALL: [Activity; 3] = [Activity::Home, Activity::SleepAtHome, Activity::NotAtHome];

    /// `true` for activities that take place inside the person's own home.
    #[inline]
    pub fn is_at_home(self) -> bool {
        matches!(self, Activity::Home | Activity::SleepAtHome)
    }

    #[inline]
    pub fn is_asleep(self) -> bool {
        matches!(self, Activity::SleepAtHome)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Activity::Home => "home",
            Activity::SleepAtHome => "sleep_at_home",
            Activity::NotAtHome => "not_at_home",
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A person's state as seen by the dwelling it is in.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OccupantStatus {
    pub person:         PersonId,
    pub activity:       Activity,
    /// Heat given off [W].
    pub metabolic_rate: f64,
}

// ── Person ────────────────────────────────────────────────────────────────────

/// Per-person inputs of a scenario.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PersonParams {
    pub initial_activity:       Activity,
    /// Metabolic rate while awake [W].
    pub active_metabolic_rate:  f64,
    /// Metabolic rate while asleep [W].
    pub passive_metabolic_rate: f64,
}

impl Default for PersonParams {
    fn default() -> Self {
        Self {
            initial_activity:       Activity::Home,
            active_metabolic_rate:  120.0,
            passive_metabolic_rate: 70.0,
        }
    }
}

/// A citizen choosing activities and moving in and out of its home.
#[derive(Debug)]
pub struct Person {
    id:                PersonId,
    params:            PersonParams,
    chain:             Arc<HeterogeneousMarkovChain<Activity>>,
    home:              DwellingHandle,
    activity:          Activity,
    /// Whether `home` currently counts this person as an occupant.
    at_home:           bool,
    current_unix_secs: i64,
    step_secs:         u32,
    rng:               EntityRng,
}

impl Person {
    pub fn new(
        id: PersonId,
        params: PersonParams,
        chain: Arc<HeterogeneousMarkovChain<Activity>>,
        home: DwellingHandle,
        start_unix_secs: i64,
        step_secs: u32,
        rng: EntityRng,
    ) -> Self {
        Self {
            id,
            params,
            chain,
            home,
            activity: params.initial_activity,
            at_home: false,
            current_unix_secs: start_unix_secs,
            step_secs,
            rng,
        }
    }

    pub fn id(&self) -> PersonId {
        self.id
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    /// Timestamp of the next step.
    pub fn current_unix_secs(&self) -> i64 {
        self.current_unix_secs
    }

    pub fn metabolic_rate(&self) -> f64 {
        if self.activity.is_asleep() {
            self.params.passive_metabolic_rate
        } else {
            self.params.active_metabolic_rate
        }
    }

    pub fn status(&self) -> OccupantStatus {
        OccupantStatus {
            person:         self.id,
            activity:       self.activity,
            metabolic_rate: self.metabolic_rate(),
        }
    }

    /// Register the initial location with the home.
    ///
    /// Returns the pending notification of the home, if one was sent.
    pub fn settle(&mut self, me: &PersonHandle) -> Option<Pending<()>> {
        self.update_location(me)
    }

    /// Draw the next activity, notify the home of any move, and advance the
    /// person's clock by one step.
    ///
    /// The notification is only issued here; the caller awaits it.
    pub fn step(&mut self, me: &PersonHandle) -> ModelResult<Option<Pending<()>>> {
        let draw = self.rng.unit();
        let next = self.chain.move_state(self.activity, self.current_unix_secs, draw)?;
        trace!(person = %self.id, from = %self.activity, to = %next, "activity");
        self.activity = next;
        let movement = self.update_location(me);
        self.current_unix_secs += self.step_secs as i64;
        Ok(movement)
    }

    fn update_location(&mut self, me: &PersonHandle) -> Option<Pending<()>> {
        match (self.at_home, self.activity.is_at_home()) {
            (true, false) => {
                self.at_home = false;
                Some(self.home.leave(self.id))
            }
            (false, true) => {
                self.at_home = true;
                Some(self.home.enter(me.clone()))
            }
            _ => None,
        }
    }
}

// ── PersonHandle ──────────────────────────────────────────────────────────────

/// The only way to reach a [`Person`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PersonHandle {
    id:    PersonId,
    actor: Actor<Person>,
}

impl PersonHandle {
    pub fn spawn(pool: &PoolHandle, person: Person) -> Self {
        let id = person.id();
        Self { id, actor: Actor::spawn(pool, EntityKey::Person(id), person) }
    }

    pub fn id(&self) -> PersonId {
        self.id
    }

    pub fn actor(&self) -> &Actor<Person> {
        &self.actor
    }

    /// Advance the person by one step, including the resulting enter/leave on
    /// its home.  Resolves once the home has applied the move.
    pub fn step(&self) -> impl Future<Output = ModelResult<()>> + Send + 'static {
        let me = self.clone();
        let stepped = self.actor.try_call(move |p: &mut Person| p.step(&me));
        async move {
            if let Some(movement) = stepped.await? {
                movement.await?;
            }
            Ok(())
        }
    }

    /// Register the person's initial location with its home.
    pub fn settle(&self) -> impl Future<Output = ModelResult<()>> + Send + 'static {
        let me = self.clone();
        let settled = self.actor.call(move |p: &mut Person| p.settle(&me));
        async move {
            if let Some(movement) = settled.await? {
                movement.await?;
            }
            Ok(())
        }
    }

    pub fn activity(&self) -> Pending<Activity> {
        self.actor.call(|p: &mut Person| p.activity())
    }

    pub fn metabolic_rate(&self) -> Pending<f64> {
        self.actor.call(|p: &mut Person| p.metabolic_rate())
    }

    pub fn status(&self) -> Pending<OccupantStatus> {
        self.actor.call(|p: &mut Person| p.status())
    }

    pub fn current_unix_secs(&self) -> Pending<i64> {
        self.actor.call(|p: &mut Person| p.current_unix_secs())
    }
}
