use thiserror::Error;

use pnn_connect::ConnectError;
use pnn_model::{ComponentKind, ModelError};
use pnn_unit::UnitError;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("projection {projection}: no population named {name:?}")]
    UnknownPopulation {
        projection: String,
        name:       String,
    },

    #[error("projection {projection}: endpoint {endpoint:?} is a group, not a flat population")]
    NonFlatEndpoint {
        projection: String,
        endpoint:   String,
    },

    #[error("component {component:?} is a {found}, expected a {expected}")]
    WrongKind {
        component: String,
        expected:  &'static str,
        found:     ComponentKind,
    },

    #[error("projection {projection}: target population {population:?} has no inlet ports (spike source)")]
    SourceAsTarget {
        projection: String,
        population: String,
    },

    #[error("component {component:?}: explicit connections need `connections` or `connection_file`")]
    MissingConnections {
        component: String,
    },

    #[error("projection {projection}: {what} index {index} out of range for population of {size}")]
    IndexOutOfRange {
        projection: String,
        what:       &'static str,
        index:      usize,
        size:       usize,
    },

    #[error("projection {projection}: {source}")]
    Connection {
        projection: String,
        #[source]
        source:     ConnectError,
    },

    #[error("report variable {path}: {reason}")]
    UnknownVariable {
        path:   String,
        reason: String,
    },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Unit(#[from] UnitError),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
