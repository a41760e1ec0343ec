//! Declarative connection rules.
//!
//! A [`ConnectionRule`] is what a projection's connection component resolves
//! to once its parameters are bound.  Calling [`ConnectionRule::generator`]
//! turns it into a fresh single-pass [`ConnectionGenerator`] over a mask.

use pnn_core::SimRng;

use crate::generator::{
    AllToAll, ConnectionGenerator, ExplicitList, FixedProbability, Mask, OneToOne,
};
use crate::{ConnectError, ConnectResult};

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionRule {
    /// Enumerated rows of `source, target[, weight[, delay[, extra…]]]`.
    Explicit(Vec<Vec<f64>>),

    AllToAll {
        weight:   f64,
        delay:    f64,
        autapses: bool,
    },

    OneToOne {
        weight: f64,
        delay:  f64,
    },

    FixedProbability {
        p:        f64,
        weight:   f64,
        delay:    f64,
        autapses: bool,
    },
}

impl ConnectionRule {
    /// Short lowercase name used in log lines and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ConnectionRule::Explicit(_)             => "explicit",
            ConnectionRule::AllToAll { .. }         => "all_to_all",
            ConnectionRule::OneToOne { .. }         => "one_to_one",
            ConnectionRule::FixedProbability { .. } => "fixed_probability",
        }
    }

    /// Reject rule parameters that can never produce a valid connection.
    pub fn validate(&self) -> ConnectResult<()> {
        let delay = match self {
            ConnectionRule::Explicit(_) => return Ok(()),
            ConnectionRule::AllToAll { delay, .. } | ConnectionRule::OneToOne { delay, .. } => *delay,
            ConnectionRule::FixedProbability { p, delay, .. } => {
                if !(0.0..=1.0).contains(p) {
                    return Err(ConnectError::Rule(format!(
                        "fixed_probability: p must lie in [0, 1], got {p}"
                    )));
                }
                *delay
            }
        };
        if delay < 0.0 || delay.is_nan() {
            return Err(ConnectError::Rule(format!(
                "{}: delay must be non-negative, got {delay}",
                self.kind()
            )));
        }
        Ok(())
    }

    /// Build a generator over `mask`.
    ///
    /// `rng` is consumed only by probabilistic rules.  Explicit rows ignore
    /// the mask; their indices are range-checked by the consumer.
    pub fn generator(
        &self,
        mask: Mask,
        rng:  SimRng,
    ) -> ConnectResult<Box<dyn ConnectionGenerator>> {
        self.validate()?;
        let generator: Box<dyn ConnectionGenerator> = match self {
            ConnectionRule::Explicit(rows) => Box::new(ExplicitList::new(rows.clone())),
            ConnectionRule::AllToAll { weight, delay, autapses } => {
                Box::new(AllToAll::new(mask, *weight, *delay, *autapses))
            }
            ConnectionRule::OneToOne { weight, delay } => {
                Box::new(OneToOne::new(mask, *weight, *delay))
            }
            ConnectionRule::FixedProbability { p, weight, delay, autapses } => {
                Box::new(FixedProbability::new(mask, *p, *weight, *delay, *autapses, rng))
            }
        };
        Ok(generator)
    }
}
