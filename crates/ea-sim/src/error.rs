use ea_actor::ActorError;
use ea_core::{ChainId, CoreError, DwellingId, PersonId, Tick};
use ea_model::ModelError;
use ea_output::OutputError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("{person} lives in unknown {dwelling}")]
    UnknownDwelling {
        person:   PersonId,
        dwelling: DwellingId,
    },

    #[error("{person} follows unknown {chain}")]
    UnknownChain {
        person: PersonId,
        chain:  ChainId,
    },

    #[error(transparent)]
    Actor(#[from] ActorError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error("simulation already stopped")]
    AlreadyStopped,

    /// Any failure of one tick.  The tick counter was not advanced.
    #[error("tick {tick} failed: {source}")]
    Tick {
        tick:   Tick,
        #[source]
        source: Box<SimError>,
    },
}

pub type SimResult<T> = Result<T, SimError>;
