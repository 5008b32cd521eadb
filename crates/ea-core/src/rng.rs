//! Deterministic per-entity RNG.
//!
//! # Determinism strategy
//!
//! Every stochastic entity (today: every person) owns its own `SmallRng`
//! seeded by:
//!
//!   seed = global_seed XOR (stream * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive stream numbers uniformly across the seed space.
//! This means:
//!
//! - Entities never share RNG state, so the order in which the execution
//!   pool happens to run them cannot change what they draw.
//! - Adding entities does not disturb the seeds of existing ones.
//! - The stream lives inside the entity and is only touched on the entity's
//!   own execution context; no synchronisation needed.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::PersonId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Random stream owned exclusively by one entity.
pub struct EntityRng(SmallRng);

impl EntityRng {
    /// Seed deterministically from the run's global seed and a stream number.
    pub fn new(global_seed: u64, stream: u64) -> Self {
        let seed = global_seed ^ stream.wrapping_mul(MIXING_CONSTANT);
        EntityRng(SmallRng::seed_from_u64(seed))
    }

    /// The stream of one person.
    pub fn for_person(global_seed: u64, person: PersonId) -> Self {
        Self::new(global_seed, person.0 as u64)
    }

    /// Uniform draw in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }
}

impl std::fmt::Debug for EntityRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EntityRng(..)")
    }
}
