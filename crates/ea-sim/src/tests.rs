//! Tests for the phase coordinator, run loop, and scenario builder.

use std::sync::Arc;

use ea_actor::{ExecutionPool, PoolConfig};
use ea_core::{ChainId, DwellingId, PersonId, SimConfig, Tick};
use ea_model::{
    Activity, DwellingParams, HeatingStrategy, HeterogeneousMarkovChain, MarkovChain, ModelError,
    PersonParams, TimeSeries,
};

use crate::*;

// ── Fixtures ──────────────────────────────────────────────────────────────────

/// Monday 2024-01-01 00:00:00 UTC.
const MONDAY: i64 = 1_704_067_200;
const STEP: u32 = 600;

fn config(total_ticks: u64) -> SimConfig {
    SimConfig {
        start_unix_secs:    MONDAY,
        tick_duration_secs: STEP,
        total_ticks,
        seed:               42,
        num_threads:        Some(2),
        lanes_per_thread:   2,
    }
}

fn pool(workers: usize, lanes: usize) -> ExecutionPool {
    ExecutionPool::new(PoolConfig::new(workers, lanes)).unwrap()
}

fn outdoor(ticks: u64) -> TimeSeries<f64> {
    TimeSeries::from_values(MONDAY, STEP, (0..=ticks).map(|i| 2.0 + (i % 12) as f64).collect())
}

fn always(to: Activity) -> HeterogeneousMarkovChain<Activity> {
    let chain = MarkovChain::new(Activity::ALL.map(|from| (from, to, 1.0))).unwrap();
    HeterogeneousMarkovChain::from_fn(STEP, |_, _| Ok(chain.clone())).unwrap()
}

/// Stay put with probability 0.6, otherwise move to one of the other two.
fn restless() -> HeterogeneousMarkovChain<Activity> {
    let chain = MarkovChain::new(Activity::ALL.into_iter().flat_map(|from| {
        Activity::ALL
            .into_iter()
            .map(move |to| (from, to, if from == to { 0.6 } else { 0.2 }))
    }))
    .unwrap();
    HeterogeneousMarkovChain::from_fn(STEP, |_, _| Ok(chain.clone())).unwrap()
}

fn dwelling(id: u32, strategy: HeatingStrategy) -> DwellingSpec {
    DwellingSpec {
        id:     DwellingId(id),
        params: DwellingParams { strategy, ..DwellingParams::default() },
    }
}

fn person(id: u32, home: u32, initial_activity: Activity) -> PersonSpec {
    PersonSpec {
        id:     PersonId(id),
        home:   DwellingId(home),
        chain:  ChainId::DEFAULT,
        params: PersonParams { initial_activity, ..PersonParams::default() },
    }
}

/// `dwellings` homes with `per_home` people each; person `h * per_home + j`
/// lives in dwelling `h`.
fn city_builder(
    total_ticks: u64,
    dwellings: u32,
    per_home: u32,
    chain: HeterogeneousMarkovChain<Activity>,
) -> ScenarioBuilder {
    let strategy = HeatingStrategy::PresenceBased { active: 21.0, asleep: 17.0 };
    ScenarioBuilder::new(config(total_ticks))
        .markov_chain(chain)
        .outdoor_temperature(outdoor(total_ticks))
        .dwellings((0..dwellings).map(|d| dwelling(d, strategy)))
        .people((0..dwellings).flat_map(|d| {
            (0..per_home).map(move |j| person(d * per_home + j, d, Activity::Home))
        }))
}

// ── Phase coordinator ─────────────────────────────────────────────────────────

#[cfg(test)]
mod tick_tests {
    use futures::future::try_join_all;

    use super::*;

    /// Simulated time of every entity, in one vector.
    fn entity_clocks(pool: &ExecutionPool, sim: &CitySim) -> Vec<i64> {
        pool.block_on(async {
            let mut clocks = try_join_all(sim.people().iter().map(|p| p.current_unix_secs())).await?;
            clocks.extend(try_join_all(sim.dwellings().iter().map(|d| d.current_unix_secs())).await?);
            clocks.push(sim.environment().current_unix_secs().await?);
            Ok::<_, ea_actor::ActorError>(clocks)
        })
        .unwrap()
        .unwrap()
    }

    #[test]
    fn every_entity_steps_once_per_tick_until_done() {
        let pool = pool(2, 4);
        let mut sim = city_builder(5, 4, 3, restless()).build(&pool).unwrap();

        for expected in 1..=5u64 {
            assert_eq!(pool.block_on(sim.tick()).unwrap().unwrap(), TickOutcome::Continue);
            assert_eq!(sim.clock().current_tick, Tick(expected));
            let clocks = entity_clocks(&pool, &sim);
            assert_eq!(clocks.len(), 12 + 4 + 1);
            assert!(clocks.iter().all(|&c| c == MONDAY + expected as i64 * STEP as i64));
        }

        // Past the bound nothing runs, however often it is asked.
        for _ in 0..3 {
            assert_eq!(pool.block_on(sim.tick()).unwrap().unwrap(), TickOutcome::Done);
        }
        assert_eq!(sim.clock().current_tick, Tick(5));
        assert!(entity_clocks(&pool, &sim).iter().all(|&c| c == MONDAY + 5 * STEP as i64));
        pool.shutdown().unwrap();
    }

    #[test]
    fn dwellings_see_exactly_this_ticks_occupancy() {
        let pool = pool(3, 5);
        let per_home = 4;
        let mut sim = city_builder(40, 6, per_home, restless()).build(&pool).unwrap();

        for _ in 0..40 {
            assert_eq!(pool.block_on(sim.tick()).unwrap().unwrap(), TickOutcome::Continue);
            let (activities, observed, occupants) = pool
                .block_on(async {
                    let activities = try_join_all(sim.people().iter().map(|p| p.activity())).await?;
                    let observed =
                        try_join_all(sim.dwellings().iter().map(|d| d.observed_occupants())).await?;
                    let occupants = try_join_all(sim.dwellings().iter().map(|d| d.occupants())).await?;
                    Ok::<_, ea_actor::ActorError>((activities, observed, occupants))
                })
                .unwrap()
                .unwrap();

            for (d, (seen, inside)) in observed.iter().zip(&occupants).enumerate() {
                let expected: Vec<PersonId> = (0..per_home)
                    .map(|j| d as u32 * per_home + j)
                    .filter(|&id| activities[id as usize].is_at_home())
                    .map(PersonId)
                    .collect();
                assert_eq!(seen, &expected, "dwelling {d} stepped with stale occupancy");
                assert_eq!(inside, &expected);
            }
        }
        pool.shutdown().unwrap();
    }

    #[test]
    fn person_moving_home_is_seen_by_the_same_tick() {
        let pool = pool(2, 4);
        let mut sim = ScenarioBuilder::new(config(3))
            .markov_chain(always(Activity::Home))
            .outdoor_temperature(outdoor(3))
            .dwelling(dwelling(0, HeatingStrategy::NoHeating))
            .dwelling(dwelling(1, HeatingStrategy::NoHeating))
            .person(person(0, 0, Activity::NotAtHome))
            .in_memory()
            .build(&pool)
            .unwrap();

        let before = pool.block_on(sim.dwellings()[0].occupants()).unwrap().unwrap();
        assert!(before.is_empty());

        assert_eq!(pool.block_on(sim.tick()).unwrap().unwrap(), TickOutcome::Continue);
        let (a, b, warm, cold) = pool
            .block_on(async {
                let a = sim.dwellings()[0].observed_occupants().await?;
                let b = sim.dwellings()[1].observed_occupants().await?;
                let warm = sim.dwellings()[0].temperature().await?;
                let cold = sim.dwellings()[1].temperature().await?;
                Ok::<_, ea_actor::ActorError>((a, b, warm, cold))
            })
            .unwrap()
            .unwrap();
        assert_eq!(a, vec![PersonId(0)]);
        assert!(b.is_empty());
        assert!(warm > cold, "metabolic gains missing: {warm} <= {cold}");

        assert_eq!(pool.block_on(sim.tick()).unwrap().unwrap(), TickOutcome::Continue);
        assert_eq!(pool.block_on(sim.tick()).unwrap().unwrap(), TickOutcome::Continue);
        assert_eq!(pool.block_on(sim.tick()).unwrap().unwrap(), TickOutcome::Done);
        pool.shutdown().unwrap();
    }

    #[test]
    fn dwellings_see_the_outdoor_temperature_before_it_advances() {
        let pool = pool(2, 4);
        let outdoor = TimeSeries::from_values(MONDAY, STEP, vec![0.0, 30.0, -10.0]);
        let mut sim = ScenarioBuilder::new(config(2))
            .outdoor_temperature(outdoor)
            .dwelling(dwelling(0, HeatingStrategy::NoHeating))
            .build(&pool)
            .unwrap();

        let params = DwellingParams::default();
        let k = STEP as f64 / params.heat_mass_capacity * params.heat_transmission;
        let next = |inside: f64, outside: f64| inside * (1.0 - k) + k * outside;

        let mut expected = params.initial_temperature;
        for (tick, (current, upcoming)) in [(0.0, 30.0), (30.0, -10.0)].into_iter().enumerate() {
            assert_eq!(pool.block_on(sim.tick()).unwrap().unwrap(), TickOutcome::Continue);
            let reached = pool.block_on(sim.dwellings()[0].temperature()).unwrap().unwrap();
            let premature = next(expected, upcoming);
            expected = next(expected, current);
            assert!((reached - expected).abs() < 1e-12, "tick {tick}: {reached} != {expected}");
            assert!((reached - premature).abs() > 1e-6, "tick {tick} used next tick's weather");
        }
        pool.shutdown().unwrap();
    }

    #[test]
    fn logger_records_one_value_per_dwelling_per_tick() {
        let pool = pool(2, 4);
        let mut sim = ScenarioBuilder::new(config(4))
            .outdoor_temperature(outdoor(4))
            .dwelling(dwelling(0, HeatingStrategy::Constant(21.0)))
            .dwelling(dwelling(1, HeatingStrategy::NoHeating))
            .in_memory()
            .build(&pool)
            .unwrap();
        while pool.block_on(sim.tick()).unwrap().unwrap() == TickOutcome::Continue {}

        let logger = sim.logger().unwrap().clone();
        let (records, timestamps) = pool
            .block_on(async { Ok::<_, ea_actor::ActorError>((logger.records().await?, logger.timestamps().await?)) })
            .unwrap()
            .unwrap();

        let expected: Vec<i64> = (1..=4).map(|k| MONDAY + k * STEP as i64).collect();
        assert_eq!(timestamps, expected);

        let temperature: Vec<_> = records.iter().filter(|r| r.data_point == "temperature").collect();
        assert_eq!(temperature.len(), 2 * 4);
        for source in [0, 1] {
            let stamps: Vec<i64> = temperature
                .iter()
                .filter(|r| r.source_id == source)
                .map(|r| r.unix_secs)
                .collect();
            assert_eq!(stamps, expected, "dwelling {source}");
        }
        // Heated dwelling holds its set point; the other cools off.
        let last = |source: u32| {
            temperature
                .iter()
                .rev()
                .find(|r| r.source_id == source)
                .and_then(|r| r.value.as_f64())
                .unwrap()
        };
        assert!((last(0) - 21.0).abs() < 1e-9);
        assert!(last(1) < 20.0);
        assert!(records.iter().all(|r| r.data_point != "activity"));
        pool.shutdown().unwrap();
    }

    #[test]
    fn failing_tick_leaves_the_counter_unchanged() {
        let pool = pool(2, 4);
        // Hourly slots only: the tick at 00:10 has no chain.
        let hourly = HeterogeneousMarkovChain::from_fn(3_600, |_, _| {
            MarkovChain::new(Activity::ALL.map(|from| (from, Activity::Home, 1.0)))
        })
        .unwrap();
        let mut sim = city_builder(10, 2, 2, hourly).in_memory().build(&pool).unwrap();

        assert_eq!(pool.block_on(sim.tick()).unwrap().unwrap(), TickOutcome::Continue);
        let failed = pool.block_on(sim.tick()).unwrap();
        match failed {
            Err(SimError::Tick { tick, source }) => {
                assert_eq!(tick, Tick(1));
                assert!(matches!(*source, SimError::Model(ModelError::NoChainForTime(_))));
            }
            other => panic!("expected a tick failure, got {other:?}"),
        }
        assert_eq!(sim.clock().current_tick, Tick(1));
        pool.shutdown().unwrap();
    }

    #[test]
    fn stop_succeeds_once() {
        let pool = pool(1, 2);
        let mut sim = city_builder(1, 1, 1, restless()).in_memory().build(&pool).unwrap();
        pool.block_on(sim.tick()).unwrap().unwrap();
        pool.block_on(sim.stop()).unwrap().unwrap();
        assert!(matches!(pool.block_on(sim.stop()).unwrap(), Err(SimError::AlreadyStopped)));
        assert_eq!(pool.block_on(sim.tick()).unwrap().unwrap(), TickOutcome::Done);
        pool.shutdown().unwrap();
    }
}

// ── Run loop ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod conductor_tests {
    use std::future::Future;
    use std::sync::Mutex;

    use super::*;

    /// A simulation that only logs what it is asked to do.
    struct Scripted {
        tick:    u64,
        bound:   u64,
        fail_at: Option<u64>,
        log:     Arc<Mutex<Vec<String>>>,
    }

    impl Scripted {
        fn new(bound: u64, fail_at: Option<u64>) -> (Self, Arc<Mutex<Vec<String>>>) {
            let log = Arc::new(Mutex::new(Vec::new()));
            (Self { tick: 0, bound, fail_at, log: Arc::clone(&log) }, log)
        }

        fn note(&self, event: impl Into<String>) {
            self.log.lock().unwrap().push(event.into());
        }
    }

    impl Simulation for Scripted {
        fn current_tick(&self) -> Tick {
            Tick(self.tick)
        }

        fn current_unix_secs(&self) -> i64 {
            MONDAY + self.tick as i64 * STEP as i64
        }

        fn step(&mut self) -> impl Future<Output = SimResult<TickOutcome>> {
            let outcome = if self.tick >= self.bound {
                self.note("done");
                Ok(TickOutcome::Done)
            } else if self.fail_at == Some(self.tick) {
                self.note(format!("fail {}", self.tick));
                Err(SimError::Tick {
                    tick:   Tick(self.tick),
                    source: Box::new(SimError::Config("scripted".into())),
                })
            } else {
                self.note(format!("step {}", self.tick));
                self.tick += 1;
                Ok(TickOutcome::Continue)
            };
            async move { outcome }
        }

        fn stop(&mut self) -> impl Future<Output = SimResult<()>> {
            self.note("stop");
            async { Ok(()) }
        }
    }

    #[derive(Default)]
    struct Counting {
        starts: u64,
        ends:   u64,
        done:   Vec<Tick>,
    }

    impl SimObserver for Counting {
        fn on_tick_start(&mut self, _tick: Tick) {
            self.starts += 1;
        }

        fn on_tick_end(&mut self, _tick: Tick, _unix_secs: i64) {
            self.ends += 1;
        }

        fn on_sim_end(&mut self, final_tick: Tick) {
            self.done.push(final_tick);
        }
    }

    #[test]
    fn stop_runs_exactly_once_after_done() {
        let (sim, log) = Scripted::new(3, None);
        let mut observer = Counting::default();
        let summary = Conductor::new(sim, pool(1, 1)).run_with(&mut observer).unwrap();

        assert_eq!(*log.lock().unwrap(), ["step 0", "step 1", "step 2", "done", "stop"]);
        assert_eq!(summary.ticks, 3);
        assert_eq!(summary.final_tick, Tick(3));
        assert_eq!(summary.unix_secs, MONDAY + 3 * STEP as i64);
        assert_eq!((observer.starts, observer.ends), (4, 3));
        assert_eq!(observer.done, vec![Tick(3)]);
    }

    #[test]
    fn zero_ticks_still_stops() {
        let (sim, log) = Scripted::new(0, None);
        let summary = Conductor::new(sim, pool(1, 1)).run().unwrap();
        assert_eq!(*log.lock().unwrap(), ["done", "stop"]);
        assert_eq!(summary.ticks, 0);
    }

    #[test]
    fn failure_aborts_without_stop() {
        let (sim, log) = Scripted::new(5, Some(2));
        let err = Conductor::new(sim, pool(1, 1)).run().unwrap_err();
        assert!(matches!(err, SimError::Tick { tick: Tick(2), .. }));
        assert_eq!(*log.lock().unwrap(), ["step 0", "step 1", "fail 2"]);
    }

    #[test]
    fn city_run_writes_results_once() {
        let dir = tempfile::tempdir().unwrap();
        let pool = pool(2, 8);
        let sim = city_builder(12, 3, 2, restless())
            .writer(Box::new(ea_output::CsvWriter::new(dir.path()).unwrap()))
            .build(&pool)
            .unwrap();
        let summary = Conductor::new(sim, pool).run().unwrap();
        assert_eq!(summary.ticks, 12);

        let mut rdr = csv::Reader::from_path(dir.path().join("records.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        // (3 temperatures + 3 powers + 6 activities) per tick.
        assert_eq!(rows.len(), 12 * 12);

        let mut rdr = csv::Reader::from_path(dir.path().join("metadata.csv")).unwrap();
        let keys: Vec<String> = rdr.records().map(|r| r.unwrap()[0].to_owned()).collect();
        for key in ["start_of_simulation", "end_of_simulation", "duration_of_simulation", "model_version", "ticks"] {
            assert!(keys.iter().any(|k| k == key), "missing metadata {key}");
        }
    }

    #[test]
    fn failed_city_run_writes_no_results() {
        let dir = tempfile::tempdir().unwrap();
        let pool = pool(2, 4);
        let hourly = HeterogeneousMarkovChain::from_fn(3_600, |_, _| {
            MarkovChain::new(Activity::ALL.map(|from| (from, Activity::Home, 1.0)))
        })
        .unwrap();
        let sim = city_builder(6, 2, 1, hourly)
            .writer(Box::new(ea_output::CsvWriter::new(dir.path()).unwrap()))
            .build(&pool)
            .unwrap();
        let err = Conductor::new(sim, pool).run().unwrap_err();
        assert!(matches!(err, SimError::Tick { tick: Tick(1), .. }));

        let mut rdr = csv::Reader::from_path(dir.path().join("metadata.csv")).unwrap();
        assert_eq!(rdr.records().count(), 0);
    }

    /// Identical seeds give identical results, whatever the pool size.
    #[test]
    fn results_do_not_depend_on_pool_size() {
        let run = |workers: usize, lanes: usize| {
            let dir = tempfile::tempdir().unwrap();
            let pool = pool(workers, lanes);
            let sim = city_builder(48, 5, 4, restless())
                .writer(Box::new(ea_output::CsvWriter::new(dir.path()).unwrap()))
                .build(&pool)
                .unwrap();
            Conductor::new(sim, pool).run().unwrap();
            std::fs::read_to_string(dir.path().join("records.csv")).unwrap()
        };
        let reference = run(1, 1);
        assert!(reference.lines().count() > 48);
        assert_eq!(run(2, 3), reference);
        assert_eq!(run(4, 32), reference);
    }
}

// ── Scenario builder ──────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    fn rejects(builder: ScenarioBuilder) -> SimError {
        let pool = pool(1, 1);
        let err = match builder.build(&pool) {
            Ok(_) => panic!("scenario should have been rejected"),
            Err(e) => e,
        };
        pool.shutdown().unwrap();
        err
    }

    #[test]
    fn rejects_unknown_home() {
        let err = rejects(city_builder(2, 1, 1, restless()).person(person(9, 4, Activity::Home)));
        assert!(matches!(
            err,
            SimError::UnknownDwelling { person: PersonId(9), dwelling: DwellingId(4) }
        ));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = rejects(city_builder(2, 2, 1, restless()).dwelling(dwelling(1, HeatingStrategy::NoHeating)));
        assert!(matches!(err, SimError::Config(_)));
        let err = rejects(city_builder(2, 2, 1, restless()).person(person(0, 1, Activity::Home)));
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn people_need_a_known_chain() {
        let err = rejects(
            ScenarioBuilder::new(config(2))
                .outdoor_temperature(outdoor(2))
                .dwelling(dwelling(0, HeatingStrategy::NoHeating))
                .person(person(0, 0, Activity::Home)),
        );
        assert!(matches!(
            err,
            SimError::UnknownChain { person: PersonId(0), chain: ChainId::DEFAULT }
        ));

        let stray = PersonSpec { chain: ChainId(3), ..person(5, 0, Activity::Home) };
        let err = rejects(
            city_builder(2, 1, 1, restless())
                .markov_chains([(ChainId(2), always(Activity::Home))])
                .person(stray),
        );
        assert!(matches!(err, SimError::UnknownChain { person: PersonId(5), chain: ChainId(3) }));
    }

    #[test]
    fn each_person_follows_its_own_chain() {
        let pool = pool(2, 4);
        let homebody = ChainId(1);
        let mut sim = ScenarioBuilder::new(config(3))
            .markov_chains([
                (ChainId::DEFAULT, always(Activity::NotAtHome)),
                (homebody, always(Activity::SleepAtHome)),
            ])
            .outdoor_temperature(outdoor(3))
            .dwelling(dwelling(0, HeatingStrategy::NoHeating))
            .person(person(0, 0, Activity::Home))
            .person(PersonSpec { chain: homebody, ..person(1, 0, Activity::Home) })
            .build(&pool)
            .unwrap();

        assert_eq!(pool.block_on(sim.tick()).unwrap().unwrap(), TickOutcome::Continue);
        let (out, home, inside) = pool
            .block_on(async {
                let out = sim.people()[0].activity().await?;
                let home = sim.people()[1].activity().await?;
                let inside = sim.dwellings()[0].observed_occupants().await?;
                Ok::<_, ea_actor::ActorError>((out, home, inside))
            })
            .unwrap()
            .unwrap();
        assert_eq!(out, Activity::NotAtHome);
        assert_eq!(home, Activity::SleepAtHome);
        assert_eq!(inside, vec![PersonId(1)]);
        pool.shutdown().unwrap();
    }

    #[test]
    fn logger_records_only_selected_data_points() {
        let pool = pool(2, 4);
        let mut sim = city_builder(2, 2, 2, restless())
            .log(LogSelection { temperature: false, thermal_power: true, activity: false })
            .in_memory()
            .build(&pool)
            .unwrap();
        while pool.block_on(sim.tick()).unwrap().unwrap() == TickOutcome::Continue {}

        let records = pool.block_on(sim.logger().unwrap().records()).unwrap().unwrap();
        assert_eq!(records.len(), 2 * 2);
        assert!(records.iter().all(|r| r.data_point == "thermalPower"));
        pool.shutdown().unwrap();
    }

    #[test]
    fn unbounded_tick_count_is_rejected() {
        let endless = SimConfig { total_ticks: u64::MAX, ..config(2) };
        let err = rejects(
            ScenarioBuilder::new(endless)
                .outdoor_temperature(outdoor(2))
                .dwelling(dwelling(0, HeatingStrategy::NoHeating)),
        );
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn outdoor_series_must_cover_the_run() {
        let err = rejects(city_builder(5, 1, 1, restless()).outdoor_temperature(outdoor(4)));
        assert!(matches!(err, SimError::Config(_)));

        let late = TimeSeries::from_values(MONDAY + STEP as i64, STEP, vec![1.0; 10]);
        let err = rejects(city_builder(5, 1, 1, restless()).outdoor_temperature(late));
        assert!(matches!(err, SimError::Config(_)));

        let hourly = TimeSeries::from_values(MONDAY, 3_600, vec![1.0; 10]);
        let err = rejects(city_builder(5, 1, 1, restless()).outdoor_temperature(hourly));
        assert!(matches!(err, SimError::Model(ModelError::InvalidSeries(_))));
    }

    #[test]
    fn rejects_invalid_config() {
        let bad = SimConfig { tick_duration_secs: 0, ..config(2) };
        let err = rejects(ScenarioBuilder::new(bad).outdoor_temperature(outdoor(2)));
        assert!(matches!(err, SimError::Core(_)));
    }

    #[test]
    fn people_start_registered_at_home() {
        let pool = pool(2, 2);
        let sim = ScenarioBuilder::new(config(1))
            .markov_chain(restless())
            .outdoor_temperature(outdoor(1))
            .dwelling(dwelling(0, HeatingStrategy::NoHeating))
            .people([
                person(2, 0, Activity::SleepAtHome),
                person(0, 0, Activity::NotAtHome),
                person(1, 0, Activity::Home),
            ])
            .build(&pool)
            .unwrap();
        let inside = pool.block_on(sim.dwellings()[0].occupants()).unwrap().unwrap();
        assert_eq!(inside, vec![PersonId(1), PersonId(2)]);
        let ids: Vec<PersonId> = sim.people().iter().map(|p| p.id()).collect();
        assert_eq!(ids, [PersonId(0), PersonId(1), PersonId(2)]);
        assert!(sim.logger().is_none());
        pool.shutdown().unwrap();
    }
}
