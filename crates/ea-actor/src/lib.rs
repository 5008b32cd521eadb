//! `ea-actor` — execution pool and actor handles.
//!
//! # Model
//!
//! ```text
//!   workers (OS threads, fixed)      ◄── tokio multi-thread runtime
//!     ▲
//!     │ multiplexed
//!   lanes (ContextId 0..L, fixed)    ◄── one task + mailbox each, runs
//!     ▲                                  one job at a time
//!     │ bound once, round-robin
//!   entities (EntityKey, many)       ◄── owned by an Actor<E>
//! ```
//!
//! Every operation on an entity is a short synchronous closure shipped to the
//! entity's lane through [`Actor::call`].  Because an entity is bound to exactly
//! one lane for its lifetime and a lane runs one job at a time, no two
//! operations ever touch the same entity concurrently, while entities on
//! different lanes advance in parallel.
//!
//! The caller gets back a [`Pending`] future.  Awaiting it suspends the
//! *caller's* task, not a worker, and the code after the `.await` resumes on
//! the caller's context.  A lane therefore never waits for another lane, which
//! is what keeps a bounded pool from deadlocking when entities outnumber
//! workers.
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`pool`]     | `ExecutionPool`, `PoolHandle`, `PoolConfig`, ambient context |
//! | [`pending`]  | `Pending<T>` — future of one scheduled operation          |
//! | [`actor`]    | `Actor<E>` — the only way to reach an entity              |
//! | [`error`]    | `ActorError`, `ActorResult`                               |

pub mod actor;
pub mod error;
pub mod pending;
pub mod pool;


pub use actor::Actor;
pub use error::{ActorError, ActorResult};
pub use pending::Pending;
pub use pool::{ExecutionPool, PoolConfig, PoolHandle, current_context, with_context};
