//! `ea-core` — foundational types for the energy-agents city simulation.
//!
//! This crate is a dependency of every other `ea-*` crate.  It intentionally
//! has no `ea-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                  |
//! |------------|-----------------------------------------------------------|
//! | [`ids`]    | `PersonId`, `DwellingId`, `ChainId`, `ContextId`, `EntityKey` |
//! | [`time`]   | `Tick`, `SimClock`, `SimConfig`                           |
//! | [`rng`]    | `EntityRng` (one stream per stochastic entity)            |
//! | [`error`]  | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{ChainId, ContextId, DwellingId, EntityKey, PersonId};
pub use rng::EntityRng;
pub use time::{SimClock, SimConfig, Tick};
