use ea_actor::ActorError;
use ea_core::{DwellingId, PersonId};
use thiserror::Error;

use crate::Activity;

/// Failures of an entity operation.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid Markov chain: {0}")]
    InvalidChain(String),

    #[error("no Markov chain for {0}")]
    NoChainForTime(String),

    #[error("invalid time series: {0}")]
    InvalidSeries(String),

    #[error("environment time series exhausted after {0} entries")]
    SeriesExhausted(usize),

    #[error("invalid parameters for {dwelling}: {reason}")]
    InvalidParameters {
        dwelling: DwellingId,
        reason:   String,
    },

    #[error("{person} is inside {dwelling} while {activity}")]
    InconsistentOccupancy {
        dwelling: DwellingId,
        person:   PersonId,
        activity: Activity,
    },

    #[error(transparent)]
    Actor(#[from] ActorError),
}

pub type ModelResult<T> = Result<T, ModelError>;
