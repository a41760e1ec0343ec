//! The `Connection` tuple.

use crate::{ConnectError, ConnectResult};

/// One synaptic connection between two population-local neuron indices.
///
/// `delay` is the simulated latency (seconds) between the source neuron
/// firing and the target synapse's inlet port receiving the event.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub source:     usize,
    pub target:     usize,
    pub weight:     f64,
    pub delay:      f64,
    /// Any fields beyond `delay`, in row order.
    pub parameters: Vec<f64>,
}

impl Connection {
    pub fn new(source: usize, target: usize, weight: f64, delay: f64) -> Self {
        Self { source, target, weight, delay, parameters: Vec::new() }
    }

    /// Build a connection from a raw row of fields.
    ///
    /// `row` is the 0-based position of the tuple in its generator and is
    /// only used for error messages.
    pub fn from_fields(row: usize, fields: &[f64]) -> ConnectResult<Self> {
        if fields.len() < 2 {
            return Err(ConnectError::TooFewFields { row, got: fields.len() });
        }

        let source = index_field(row, "source", fields[0])?;
        let target = index_field(row, "target", fields[1])?;
        let weight = fields.get(2).copied().unwrap_or(0.0);
        let delay  = fields.get(3).copied().unwrap_or(0.0);

        if delay < 0.0 || delay.is_nan() {
            return Err(ConnectError::NegativeDelay { row, delay });
        }

        Ok(Self {
            source,
            target,
            weight,
            delay,
            parameters: fields.get(4..).map(<[f64]>::to_vec).unwrap_or_default(),
        })
    }
}

fn index_field(row: usize, what: &'static str, value: f64) -> ConnectResult<usize> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
        Ok(value as usize)
    } else {
        Err(ConnectError::InvalidIndex { row, what, value })
    }
}
