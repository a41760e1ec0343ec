//! Errors from run configuration and unit parsing.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A unit symbol outside the supported set (`mV`, `nS`, `ms`, …).
    #[error("unknown unit symbol {0:?}")]
    UnknownUnit(String),

    /// `RunConfig::validate` rejected an interval, horizon or step.
    #[error("invalid run configuration: {0}")]
    Config(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
