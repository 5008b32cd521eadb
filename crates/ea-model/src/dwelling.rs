//! Dwellings: a single-resistance, single-capacity (1R1C) thermal model.
//!
//! # Model
//!
//! The dwelling is one thermal mass `C_m` [J/K] coupled to the outside
//! through one heat transmission `H` [W/K].  For a step of `dt` seconds:
//!
//! ```text
//! T' = T * (1 - dt/C_m * H) + dt/C_m * (P + H * T_out + Q_gain)
//! ```
//!
//! where `P` is the heating power and `Q_gain` the metabolic gains of the
//! occupants.  The heating power needed to reach a set point is found by
//! probing with 10 W/m² of floor area and interpolating linearly, then capped
//! at the maximum heating power.

use std::collections::BTreeMap;
use std::future::Future;

use ea_actor::{Actor, Pending, PoolHandle};
use ea_core::{DwellingId, EntityKey, PersonId};
use futures::future::try_join_all;
use tracing::trace;

use crate::{
    EnvironmentHandle, HeatingStrategy, ModelError, ModelResult, OccupantStatus, PersonHandle,
};

/// Heating power per square metre of floor area used to probe the response.
const PROBE_POWER_PER_AREA: f64 = 10.0;

// ── DwellingParams ────────────────────────────────────────────────────────────

/// Physical parameters and control of one dwelling.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DwellingParams {
    /// [J/K]
    pub heat_mass_capacity:     f64,
    /// [W/K]
    pub heat_transmission:      f64,
    /// [W]; may be `f64::INFINITY`.
    pub max_heating_power:      f64,
    /// [m²]
    pub conditioned_floor_area: f64,
    /// [℃]
    pub initial_temperature:    f64,
    pub strategy:               HeatingStrategy,
}

impl DwellingParams {
    fn validate(&self, id: DwellingId) -> ModelResult<()> {
        let invalid = |reason: &str| {
            Err(ModelError::InvalidParameters { dwelling: id, reason: reason.to_owned() })
        };
        let positive = |v: f64| v > 0.0;
        let non_negative = |v: f64| v >= 0.0;
        if !positive(self.heat_mass_capacity) {
            return invalid("heat mass capacity must be positive");
        }
        if !non_negative(self.heat_transmission) {
            return invalid("heat transmission must not be negative");
        }
        if !non_negative(self.max_heating_power) {
            return invalid("maximum heating power must not be negative");
        }
        if !positive(self.conditioned_floor_area) {
            return invalid("conditioned floor area must be positive");
        }
        if !self.initial_temperature.is_finite() {
            return invalid("initial temperature must be finite");
        }
        Ok(())
    }
}

impl Default for DwellingParams {
    /// A 100 m² dwelling with unlimited heating to 20 ℃.
    fn default() -> Self {
        Self {
            heat_mass_capacity:     165_000.0 * 100.0,
            heat_transmission:      200.0,
            max_heating_power:      f64::INFINITY,
            conditioned_floor_area: 100.0,
            initial_temperature:    20.0,
            strategy:               HeatingStrategy::Constant(20.0),
        }
    }
}

// ── Dwelling ──────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Dwelling {
    id:                DwellingId,
    params:            DwellingParams,
    step_secs:         u32,
    current_unix_secs: i64,
    temperature:       f64,
    thermal_power:     f64,
    /// People currently inside, keyed (and therefore ordered) by id.
    occupants:         BTreeMap<PersonId, PersonHandle>,
    /// Occupants whose status the latest step used.
    observed:          Vec<PersonId>,
}

impl Dwelling {
    pub fn new(
        id: DwellingId,
        params: DwellingParams,
        start_unix_secs: i64,
        step_secs: u32,
    ) -> ModelResult<Self> {
        params.validate(id)?;
        Ok(Self {
            id,
            params,
            step_secs,
            current_unix_secs: start_unix_secs,
            temperature: params.initial_temperature,
            thermal_power: 0.0,
            occupants: BTreeMap::new(),
            observed: Vec::new(),
        })
    }

    pub fn id(&self) -> DwellingId {
        self.id
    }

    /// Indoor temperature [℃].
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Heating power of the latest step [W].
    pub fn thermal_power(&self) -> f64 {
        self.thermal_power
    }

    pub fn current_unix_secs(&self) -> i64 {
        self.current_unix_secs
    }

    /// Idempotent.
    pub fn enter(&mut self, person: PersonHandle) {
        self.occupants.insert(person.id(), person);
    }

    /// Idempotent.
    pub fn leave(&mut self, person: PersonId) {
        self.occupants.remove(&person);
    }

    /// Ids of the people inside, ascending.
    pub fn occupant_ids(&self) -> Vec<PersonId> {
        self.occupants.keys().copied().collect()
    }

    pub fn observed_occupants(&self) -> &[PersonId] {
        &self.observed
    }

    fn occupant_handles(&self) -> Vec<PersonHandle> {
        self.occupants.values().cloned().collect()
    }

    /// Advance by one step given the outdoor temperature and the status of
    /// every occupant.
    ///
    /// Metabolic gains are summed in the order of `occupants`.
    pub fn step(&mut self, outdoor: f64, occupants: &[OccupantStatus]) -> ModelResult<()> {
        let set_point = self.params.strategy.set_point(self.id, occupants)?;
        let gains: f64 = occupants.iter().map(|o| o.metabolic_rate).sum();

        let free = self.next_temperature(outdoor, 0.0, gains);
        let power = match set_point {
            Some(set_point) if free < set_point => {
                let probe = PROBE_POWER_PER_AREA * self.params.conditioned_floor_area;
                let probed = self.next_temperature(outdoor, probe, gains);
                let unrestricted = probe * (set_point - free) / (probed - free);
                if unrestricted.abs() <= self.params.max_heating_power.abs() {
                    unrestricted
                } else {
                    self.params.max_heating_power
                }
            }
            _ => 0.0,
        };

        self.temperature = self.next_temperature(outdoor, power, gains);
        self.thermal_power = power;
        self.observed = occupants.iter().map(|o| o.person).collect();
        self.current_unix_secs += self.step_secs as i64;
        trace!(
            dwelling = %self.id,
            temperature = self.temperature,
            power,
            occupants = occupants.len(),
            "dwelling stepped"
        );
        Ok(())
    }

    fn next_temperature(&self, outdoor: f64, power: f64, gains: f64) -> f64 {
        let dt_by_cm = self.step_secs as f64 / self.params.heat_mass_capacity;
        let h = self.params.heat_transmission;
        self.temperature * (1.0 - dt_by_cm * h) + dt_by_cm * (power + h * outdoor + gains)
    }
}

// ── DwellingHandle ────────────────────────────────────────────────────────────

/// The only way to reach a [`Dwelling`].
///
/// Also carries the environment the dwelling reads its outdoor temperature
/// from.
#[derive(Clone, Debug)]
pub struct DwellingHandle {
    id:          DwellingId,
    actor:       Actor<Dwelling>,
    environment: EnvironmentHandle,
}

impl DwellingHandle {
    pub fn spawn(pool: &PoolHandle, dwelling: Dwelling, environment: EnvironmentHandle) -> Self {
        let id = dwelling.id();
        Self {
            id,
            actor: Actor::spawn(pool, EntityKey::Dwelling(id), dwelling),
            environment,
        }
    }

    pub fn id(&self) -> DwellingId {
        self.id
    }

    pub fn actor(&self) -> &Actor<Dwelling> {
        &self.actor
    }

    /// Advance the dwelling by one step.
    ///
    /// The occupant statuses and the outdoor temperature are collected on the
    /// caller's context between two calls into the dwelling.
    pub fn step(&self) -> impl Future<Output = ModelResult<()>> + Send + 'static {
        let snapshot = self.actor.call(|d: &mut Dwelling| d.occupant_handles());
        let outdoor = self.environment.outdoor_temperature();
        let actor = self.actor.clone();
        async move {
            let occupants = snapshot.await?;
            let (outdoor, statuses) = futures::try_join!(
                outdoor,
                try_join_all(occupants.iter().map(PersonHandle::status)),
            )?;
            actor
                .try_call(move |d: &mut Dwelling| d.step(outdoor, &statuses))
                .await
        }
    }

    pub fn enter(&self, person: PersonHandle) -> Pending<()> {
        self.actor.call(move |d: &mut Dwelling| d.enter(person))
    }

    pub fn leave(&self, person: PersonId) -> Pending<()> {
        self.actor.call(move |d: &mut Dwelling| d.leave(person))
    }

    pub fn temperature(&self) -> Pending<f64> {
        self.actor.call(|d: &mut Dwelling| d.temperature())
    }

    pub fn thermal_power(&self) -> Pending<f64> {
        self.actor.call(|d: &mut Dwelling| d.thermal_power())
    }

    pub fn current_unix_secs(&self) -> Pending<i64> {
        self.actor.call(|d: &mut Dwelling| d.current_unix_secs())
    }

    pub fn occupants(&self) -> Pending<Vec<PersonId>> {
        self.actor.call(|d: &mut Dwelling| d.occupant_ids())
    }

    pub fn observed_occupants(&self) -> Pending<Vec<PersonId>> {
        self.actor.call(|d: &mut Dwelling| d.observed_occupants().to_vec())
    }
}

impl PartialEq for DwellingHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for DwellingHandle {}

impl std::hash::Hash for DwellingHandle {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
