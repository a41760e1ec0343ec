//! Error types for pnn-output.

use thiserror::Error;

use pnn_model::ModelError;
use pnn_network::NetworkError;

/// Errors that can occur when collecting or writing simulation results.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("report variable: {0}")]
    Path(#[from] ModelError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[cfg(feature = "png")]
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
