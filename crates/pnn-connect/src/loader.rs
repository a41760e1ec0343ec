//! Tab-separated connection file loader.
//!
//! # File format
//!
//! One connection per line, fields separated by a single tab:
//!
//! ```text
//! # source  target  weight  delay
//! 0	1	5.0	2.0
//! 0	2	5.0	1.5
//! ```
//!
//! Weights and delays in the file are in the modeller's units (commonly
//! nanosiemens and milliseconds).  They are multiplied by the
//! [`ConnectionScale`] factors while loading, so the rows handed to
//! [`ExplicitList`](crate::ExplicitList) are in SI.  Indices may be written
//! as floats (`3.0`); lines starting with `#` are ignored.

use std::io::Read;
use std::path::Path;

use crate::{ConnectError, ConnectResult};

/// Multipliers applied to the weight and delay columns on load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionScale {
    pub weight: f64,
    pub delay:  f64,
}

impl Default for ConnectionScale {
    /// Weight × 1e-6 and delay ms → s, the convention of existing `.conn` exports.
    fn default() -> Self {
        Self { weight: 1e-6, delay: 1e-3 }
    }
}

impl ConnectionScale {
    /// Leave values untouched.
    pub const IDENTITY: ConnectionScale = ConnectionScale { weight: 1.0, delay: 1.0 };
}

/// Load raw connection rows from a file.
pub fn load_connections_file(path: &Path, scale: ConnectionScale) -> ConnectResult<Vec<Vec<f64>>> {
    let file = std::fs::File::open(path)?;
    load_connections_reader(file, scale)
}

/// Like [`load_connections_file`] but accepts any `Read` source.
pub fn load_connections_reader<R: Read>(
    reader: R,
    scale:  ConnectionScale,
) -> ConnectResult<Vec<Vec<f64>>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        let mut fields = record
            .iter()
            .filter(|f| !f.is_empty())
            .map(|f| {
                f.parse::<f64>().map_err(|_| {
                    ConnectError::Parse(format!("row {row}: {f:?} is not a number"))
                })
            })
            .collect::<ConnectResult<Vec<f64>>>()?;

        if fields.is_empty() {
            continue;
        }
        if let Some(w) = fields.get_mut(2) {
            *w *= scale.weight;
        }
        if let Some(d) = fields.get_mut(3) {
            *d *= scale.delay;
        }
        rows.push(fields);
    }
    Ok(rows)
}
