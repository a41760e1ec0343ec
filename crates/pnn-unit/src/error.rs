use thiserror::Error;

use pnn_model::{BuiltinModel, ModelError};

use crate::UnitState;

#[derive(Debug, Error)]
pub enum UnitError {
    #[error("unit {unit}: cannot {action} while {from}")]
    IllegalTransition {
        unit:   String,
        from:   UnitState,
        action: &'static str,
    },

    #[error("unit {unit}: no inlet port {port} on synapse slot {synapse}")]
    UnknownPort {
        unit:    String,
        synapse: usize,
        port:    usize,
    },

    #[error("unit {unit}: model {model} cannot be simulated as a {role}")]
    UnsupportedModel {
        unit:  String,
        model: BuiltinModel,
        role:  &'static str,
    },

    #[error("unit {unit}: integration failed: {reason}")]
    Integration {
        unit:   String,
        reason: String,
    },

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type UnitResult<T> = Result<T, UnitError>;
