use pnn_core::{CoreError, NeuronId};
use pnn_network::NetworkError;
use pnn_unit::UnitError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] CoreError),

    #[error(
        "minimal network delay {minimal_delay} s is smaller than the reporting interval \
         {reporting_interval} s"
    )]
    DelayBelowInterval {
        minimal_delay:      f64,
        reporting_interval: f64,
    },

    #[error("drain phase at t = {boundary} s exceeded {limit} delivered events")]
    DrainBound {
        boundary: f64,
        limit:    u64,
    },

    #[error("queued event addresses {0}, which is not in the network")]
    UnknownTarget(NeuronId),

    #[error(transparent)]
    Unit(#[from] UnitError),

    #[error(transparent)]
    Network(#[from] NetworkError),
}

pub type SimResult<T> = Result<T, SimError>;
