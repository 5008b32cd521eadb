//! Unit tests for ea-core primitives.

#[cfg(test)]
mod ids {
    use crate::{ContextId, DwellingId, EntityKey, PersonId};

    #[test]
    fn index_roundtrip() {
        let id = PersonId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(PersonId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn main_context_is_distinct() {
        assert!(ContextId::MAIN.is_main());
        assert!(!ContextId(0).is_main());
    }

    #[test]
    fn entity_keys_distinguish_kinds() {
        assert_ne!(EntityKey::Person(PersonId(1)), EntityKey::Dwelling(DwellingId(1)));
        assert_eq!(EntityKey::Dwelling(DwellingId(3)), EntityKey::Dwelling(DwellingId(3)));
    }

    #[test]
    fn display() {
        assert_eq!(PersonId(7).to_string(), "PersonId(7)");
        assert_eq!(EntityKey::Dwelling(DwellingId(2)).to_string(), "DwellingId(2)");
        assert_eq!(EntityKey::Logger.to_string(), "Logger");
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, SimConfig, Tick};

    #[test]
    fn clock_advances_by_step() {
        let mut clock = SimClock::new(1_000, 600);
        assert_eq!(clock.current_unix_secs(), 1_000);
        clock.advance();
        clock.advance();
        assert_eq!(clock.current_tick, Tick(2));
        assert_eq!(clock.current_unix_secs(), 2_200);
        assert_eq!(clock.unix_secs_at(Tick(5)), 4_000);
    }

    #[test]
    fn end_tick_is_the_bound() {
        let config = SimConfig { total_ticks: 3, ..SimConfig::default() };
        let clock = config.make_clock();
        assert_eq!(config.end_tick(), Tick(3));
        assert_eq!(clock.current_tick + 3, config.end_tick());
        assert_eq!(clock.unix_secs_at(config.end_tick()), config.start_unix_secs + 3 * 600);
        assert_eq!(Tick(3).to_string(), "T3");
    }

    #[test]
    fn lane_count_defaults_to_four_per_worker() {
        let config = SimConfig { num_threads: Some(3), ..SimConfig::default() };
        assert_eq!(config.worker_count(), 3);
        assert_eq!(config.lane_count(), 12);

        let config = SimConfig { num_threads: Some(2), lanes_per_thread: 1, ..SimConfig::default() };
        assert_eq!(config.lane_count(), 2);
    }

    #[test]
    fn validate_rejects_zero_step_and_zero_workers() {
        let bad_step = SimConfig { tick_duration_secs: 0, ..SimConfig::default() };
        assert!(bad_step.validate().is_err());
        let bad_workers = SimConfig { num_threads: Some(0), ..SimConfig::default() };
        assert!(bad_workers.validate().is_err());
        assert!(SimConfig::default().validate().is_ok());
    }
}

#[cfg(test)]
mod rng {
    use crate::{EntityRng, PersonId};

    #[test]
    fn same_seed_same_stream() {
        let mut a = EntityRng::for_person(42, PersonId(3));
        let mut b = EntityRng::for_person(42, PersonId(3));
        for _ in 0..100 {
            assert_eq!(a.unit().to_bits(), b.unit().to_bits());
        }
    }

    #[test]
    fn different_people_different_streams() {
        let mut a = EntityRng::for_person(42, PersonId(0));
        let mut b = EntityRng::for_person(42, PersonId(1));
        let xs: Vec<f64> = (0..8).map(|_| a.unit()).collect();
        let ys: Vec<f64> = (0..8).map(|_| b.unit()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn unit_is_in_range() {
        let mut rng = EntityRng::new(7, 7);
        for _ in 0..1_000 {
            let x = rng.unit();
            assert!((0.0..1.0).contains(&x));
        }
    }
}
