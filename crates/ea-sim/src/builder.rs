//! Fluent builder for constructing a [`CitySim`].

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use ea_actor::ExecutionPool;
use ea_core::{ChainId, DwellingId, EntityRng, PersonId, SimConfig};
use ea_model::{
    Activity, Dwelling, DwellingHandle, DwellingParams, Environment, EnvironmentHandle,
    HeterogeneousMarkovChain, Person, PersonHandle, PersonParams, TimeSeries,
};
use ea_output::{DataLogger, DataPoint, LoggerHandle, OutputWriter, ValueKind, probe};
use futures::future::try_join_all;
use tracing::info;

use crate::{CitySim, SimError, SimResult};

/// One dwelling of a scenario.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DwellingSpec {
    pub id:     DwellingId,
    pub params: DwellingParams,
}

/// One person of a scenario.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PersonSpec {
    pub id:     PersonId,
    pub home:   DwellingId,
    /// Activity model the person follows.
    pub chain:  ChainId,
    pub params: PersonParams,
}

/// Which data points the logger records.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LogSelection {
    /// `temperature` of every dwelling.
    pub temperature:   bool,
    /// `thermalPower` of every dwelling.
    pub thermal_power: bool,
    /// `activity` of every person.
    pub activity:      bool,
}

impl Default for LogSelection {
    fn default() -> Self {
        Self { temperature: true, thermal_power: true, activity: true }
    }
}

/// Where recorded results go.
enum Recording {
    Off,
    InMemory,
    Writer(Box<dyn OutputWriter>),
}

/// Fluent builder for [`CitySim`].
///
/// # Required inputs
///
/// - [`SimConfig`] — start, step, tick bound, seed, …
/// - an outdoor temperature series with the simulation step, covering
///   `total_ticks + 1` steps from the start
/// - a Markov chain for every [`ChainId`] a person follows
///
/// # Optional inputs
///
/// | Method           | Default                  |
/// |------------------|--------------------------|
/// | `.dwellings(v)`  | none                     |
/// | `.people(v)`     | none                     |
/// | `.writer(w)`     | no logger                |
/// | `.in_memory()`   | no logger                |
/// | `.log(sel)`      | all data points          |
///
/// With a writer or `in_memory`, a logger records `temperature` and
/// `thermalPower` of every dwelling and `activity` of every person, minus
/// whatever the [`LogSelection`] switches off.
pub struct ScenarioBuilder {
    config:    SimConfig,
    chains:    BTreeMap<ChainId, Arc<HeterogeneousMarkovChain<Activity>>>,
    outdoor:   Option<TimeSeries<f64>>,
    dwellings: Vec<DwellingSpec>,
    people:    Vec<PersonSpec>,
    recording: Recording,
    selection: LogSelection,
}

impl ScenarioBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            chains:    BTreeMap::new(),
            outdoor:   None,
            dwellings: Vec::new(),
            people:    Vec::new(),
            recording: Recording::Off,
            selection: LogSelection::default(),
        }
    }

    /// The activity model of every person following [`ChainId::DEFAULT`].
    pub fn markov_chain(mut self, chain: impl Into<Arc<HeterogeneousMarkovChain<Activity>>>) -> Self {
        self.chains.insert(ChainId::DEFAULT, chain.into());
        self
    }

    /// Activity models by id.  Replaces earlier chains with the same id.
    pub fn markov_chains<C>(mut self, chains: impl IntoIterator<Item = (ChainId, C)>) -> Self
    where
        C: Into<Arc<HeterogeneousMarkovChain<Activity>>>,
    {
        self.chains.extend(chains.into_iter().map(|(id, chain)| (id, chain.into())));
        self
    }

    pub fn outdoor_temperature(mut self, series: TimeSeries<f64>) -> Self {
        self.outdoor = Some(series);
        self
    }

    pub fn dwelling(mut self, spec: DwellingSpec) -> Self {
        self.dwellings.push(spec);
        self
    }

    pub fn dwellings(mut self, specs: impl IntoIterator<Item = DwellingSpec>) -> Self {
        self.dwellings.extend(specs);
        self
    }

    pub fn person(mut self, spec: PersonSpec) -> Self {
        self.people.push(spec);
        self
    }

    pub fn people(mut self, specs: impl IntoIterator<Item = PersonSpec>) -> Self {
        self.people.extend(specs);
        self
    }

    /// Record results and write them with `writer` when the run stops.
    pub fn writer(mut self, writer: Box<dyn OutputWriter>) -> Self {
        self.recording = Recording::Writer(writer);
        self
    }

    /// Record results without writing them anywhere.
    pub fn in_memory(mut self) -> Self {
        self.recording = Recording::InMemory;
        self
    }

    /// Restrict what the logger records.
    pub fn log(mut self, selection: LogSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Validate inputs, spawn every entity on `pool`, register the people
    /// initially at home with their dwellings, and return a ready-to-run
    /// [`CitySim`].
    pub fn build(mut self, pool: &ExecutionPool) -> SimResult<CitySim> {
        self.config.validate()?;
        let step = self.config.tick_duration_secs;
        let start = self.config.start_unix_secs;

        // ── Validate ──────────────────────────────────────────────────────
        self.dwellings.sort_by_key(|d| d.id);
        self.people.sort_by_key(|p| p.id);
        if let Some(d) = duplicate(self.dwellings.iter().map(|d| d.id)) {
            return Err(SimError::Config(format!("{d} is defined twice")));
        }
        if let Some(p) = duplicate(self.people.iter().map(|p| p.id)) {
            return Err(SimError::Config(format!("{p} is defined twice")));
        }
        let known: BTreeSet<DwellingId> = self.dwellings.iter().map(|d| d.id).collect();
        if let Some(p) = self.people.iter().find(|p| !known.contains(&p.home)) {
            return Err(SimError::UnknownDwelling { person: p.id, dwelling: p.home });
        }
        if let Some(p) = self.people.iter().find(|p| !self.chains.contains_key(&p.chain)) {
            return Err(SimError::UnknownChain { person: p.id, chain: p.chain });
        }
        let outdoor = self
            .outdoor
            .take()
            .ok_or_else(|| SimError::Config("an outdoor temperature series is required".into()))?;
        if outdoor.index().first() != Some(&start) {
            return Err(SimError::Config(
                "outdoor temperature series must begin at the simulation start".into(),
            ));
        }
        let needed = usize::try_from(self.config.total_ticks)
            .ok()
            .and_then(|n| n.checked_add(1))
            .ok_or_else(|| {
                SimError::Config(format!("{} ticks exceed any series", self.config.total_ticks))
            })?;
        if outdoor.len() < needed {
            return Err(SimError::Config(format!(
                "outdoor temperature series has {} entries, {needed} needed",
                outdoor.len()
            )));
        }

        // ── Spawn ─────────────────────────────────────────────────────────
        let handle = pool.handle();
        let environment = EnvironmentHandle::spawn(&handle, Environment::new(outdoor, step)?);

        let mut homes = BTreeMap::new();
        let mut dwellings = Vec::with_capacity(self.dwellings.len());
        for spec in &self.dwellings {
            let dwelling = Dwelling::new(spec.id, spec.params, start, step)?;
            let dwelling = DwellingHandle::spawn(&handle, dwelling, environment.clone());
            homes.insert(spec.id, dwelling.clone());
            dwellings.push(dwelling);
        }

        let mut people = Vec::with_capacity(self.people.len());
        for spec in &self.people {
            let home = homes[&spec.home].clone();
            let chain = Arc::clone(&self.chains[&spec.chain]);
            let rng = EntityRng::for_person(self.config.seed, spec.id);
            let person = Person::new(spec.id, spec.params, chain, home, start, step, rng);
            people.push(PersonHandle::spawn(&handle, person));
        }

        pool.block_on(try_join_all(people.iter().map(PersonHandle::settle)))??;

        // ── Logger ────────────────────────────────────────────────────────
        let points = data_points(self.selection, &dwellings, &people);
        let logger = match std::mem::replace(&mut self.recording, Recording::Off) {
            Recording::Off => None,
            Recording::InMemory => Some(DataLogger::in_memory(points)),
            Recording::Writer(writer) => Some(DataLogger::new(points, writer)),
        }
        .map(|logger| LoggerHandle::spawn(&handle, logger));

        info!(
            dwellings = dwellings.len(),
            people = people.len(),
            ticks = self.config.total_ticks,
            recording = logger.is_some(),
            "scenario built"
        );
        Ok(CitySim::new(self.config, people, dwellings, environment, logger))
    }
}

/// The first id that appears twice in a sorted sequence.
fn duplicate<T: PartialEq + Copy>(sorted: impl Iterator<Item = T>) -> Option<T> {
    let mut previous = None;
    for id in sorted {
        if previous == Some(id) {
            return Some(id);
        }
        previous = Some(id);
    }
    None
}

fn data_points(
    selection: LogSelection,
    dwellings: &[DwellingHandle],
    people: &[PersonHandle],
) -> Vec<DataPoint> {
    let mut points = Vec::new();
    if selection.temperature {
        let mut temperature = DataPoint::new("temperature", ValueKind::Float);
        for dwelling in dwellings {
            let d = dwelling.clone();
            temperature.add_source(dwelling.id().0, probe(move || d.temperature()));
        }
        points.push(temperature);
    }
    if selection.thermal_power {
        let mut power = DataPoint::new("thermalPower", ValueKind::Float);
        for dwelling in dwellings {
            let d = dwelling.clone();
            power.add_source(dwelling.id().0, probe(move || d.thermal_power()));
        }
        points.push(power);
    }
    if selection.activity {
        let mut activity = DataPoint::new("activity", ValueKind::Text);
        for person in people {
            let p = person.clone();
            activity.add_source(
                person.id().0,
                probe(move || {
                    let reading = p.activity();
                    async move { reading.await.map(|a| a.as_str()) }
                }),
            );
        }
        points.push(activity);
    }
    points
}
