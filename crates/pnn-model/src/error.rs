use thiserror::Error;

use pnn_core::{CoreError, Dimension};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("cannot resolve component reference {reference:?}: {reason}")]
    Resolution {
        reference: String,
        reason:    String,
    },

    #[error("malformed component description {reference:?}: {reason}")]
    ComponentParse {
        reference: String,
        reason:    String,
    },

    #[error("{referenced_by} references unknown component {name:?}")]
    UnknownComponent {
        name:          String,
        referenced_by: String,
    },

    #[error("component {component:?} has no parameter named {parameter:?}")]
    UnknownParameter {
        component: String,
        parameter: String,
    },

    #[error("component {component:?} is missing required parameter {parameter:?}")]
    MissingParameter {
        component: String,
        parameter: String,
    },

    #[error("parameter {component}.{parameter} must be a {expected}, got a {found}")]
    UnitMismatch {
        component: String,
        parameter: String,
        expected:  Dimension,
        found:     Dimension,
    },

    #[error("parameter {component}.{parameter}: {reason}")]
    InvalidParameter {
        component: String,
        parameter: String,
        reason:    String,
    },

    #[error("parameter {component}.{parameter} references unknown random distribution {distribution:?}")]
    UnknownDistribution {
        component:    String,
        parameter:    String,
        distribution: String,
    },

    #[error("{0:?} is not a valid identifier")]
    InvalidIdentifier(String),

    #[error("duplicate {what} name {name:?}")]
    Duplicate {
        what: &'static str,
        name: String,
    },

    #[error("experiment error: {0}")]
    Experiment(String),

    #[error("malformed variable path {path:?}: {reason}")]
    VariablePath {
        path:   String,
        reason: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ModelResult<T> = Result<T, ModelError>;
