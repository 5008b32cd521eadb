//! Scheduler and actor-boundary failures.

use ea_core::{ContextId, EntityKey};
use thiserror::Error;

/// Failures raised by the execution pool or at an actor handle boundary.
///
/// None of these are recoverable within a tick: a failed operation fails the
/// phase waiting on it.
#[derive(Debug, Error)]
pub enum ActorError {
    #[error("execution pool is shut down")]
    PoolClosed,

    #[error("no execution context {0}")]
    UnknownContext(ContextId),

    #[error("execution context {0} dropped an operation before replying")]
    Canceled(ContextId),

    #[error("operation panicked on execution context {context}: {message}")]
    Panicked {
        context: ContextId,
        message: String,
    },

    #[error("{0} is poisoned by an earlier panic")]
    Poisoned(EntityKey),

    /// A blocking wait was attempted from inside the pool.  Refused instead
    /// of risking a deadlock.
    #[error("blocking wait attempted on execution context {0}")]
    NestedBlock(ContextId),

    #[error("invalid pool configuration: {0}")]
    Config(String),

    #[error("execution context failed: {0}")]
    LaneFailed(String),

    #[error("runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Alias for `Result<T, ActorError>`.
pub type ActorResult<T> = Result<T, ActorError>;
