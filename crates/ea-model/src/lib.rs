//! `ea-model` — the simulation's entities and their handles.
//!
//! Each entity is a plain struct with synchronous methods; each has a typed
//! handle wrapping an [`ea_actor::Actor`] that is the only way the rest of the
//! system reaches it.
//!
//! | Module          | Entity / handle                                        |
//! |-----------------|--------------------------------------------------------|
//! | [`person`]      | `Person` / `PersonHandle`, `Activity`, `OccupantStatus`|
//! | [`markov`]      | `MarkovChain`, `HeterogeneousMarkovChain`              |
//! | [`dwelling`]    | `Dwelling` / `DwellingHandle`, `DwellingParams`        |
//! | [`strategy`]    | `HeatingStrategy`                                      |
//! | [`environment`] | `Environment` / `EnvironmentHandle`                    |
//! | [`series`]      | `TimeSeries<T>`                                        |
//! | [`error`]       | `ModelError`, `ModelResult<T>`                         |
//!
//! # Cross-entity calls
//!
//! A person that changes location notifies its home through the home's
//! handle from inside its own step, so the occupant-set mutation runs on the
//! dwelling's context.  The person's handle awaits that notification before
//! reporting the step as done.
//!
//! A dwelling needs values owned by other entities (occupant metabolic rates,
//! the outdoor temperature).  Its handle gathers them on the caller's context
//! between two calls into the dwelling; the dwelling's own operations never
//! wait on anything.

pub mod dwelling;
pub mod environment;
pub mod error;
pub mod markov;
pub mod person;
pub mod series;
pub mod strategy;


pub use dwelling::{Dwelling, DwellingHandle, DwellingParams};
pub use environment::{Environment, EnvironmentHandle};
pub use error::{ModelError, ModelResult};
pub use markov::{DayKind, HeterogeneousMarkovChain, MarkovChain};
pub use person::{Activity, OccupantStatus, Person, PersonHandle, PersonParams};
pub use series::TimeSeries;
pub use strategy::HeatingStrategy;
