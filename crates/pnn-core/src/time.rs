//! Simulation time model.
//!
//! # Design
//!
//! Simulated time is continuous and measured in seconds (`f64`).  The
//! scheduler synchronises every unit at a fixed grid of *reporting
//! boundaries*:
//!
//!   boundary(k) = k * reporting_interval,   k = 1..=n
//!
//! with the last boundary clamped to `time_horizon` exactly.  Computing each
//! boundary from `k` (instead of accumulating `t += dt`) keeps the grid free
//! of floating-point drift over long runs.

use crate::{CoreError, CoreResult};

/// Relative tolerance used when deciding whether the horizon is an integer
/// multiple of the reporting interval.
const GRID_EPSILON: f64 = 1e-9;

// ── RunConfig ─────────────────────────────────────────────────────────────────

/// Top-level run configuration.
///
/// Usually derived from an experiment description (`pnn-model`) and passed to
/// the scheduler builder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunConfig {
    /// Fixed step (seconds) at which all units are synchronised and the
    /// event queue is drained.
    pub reporting_interval: f64,

    /// Absolute end time of the run (seconds).
    pub time_horizon: f64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Internal step of the built-in fixed-step integrator (seconds).
    pub integrator_step: f64,

    /// Upper bound on events delivered during one drain phase.  `None`
    /// disables the guard.
    pub max_drain_events: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            reporting_interval: 1e-4,
            time_horizon:       0.1,
            seed:               0,
            integrator_step:    1e-5,
            max_drain_events:   Some(10_000_000),
        }
    }
}

impl RunConfig {
    /// Check the numeric fields for sanity.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.reporting_interval > 0.0) || !self.reporting_interval.is_finite() {
            return Err(CoreError::Config(format!(
                "reporting interval must be positive, got {}",
                self.reporting_interval
            )));
        }
        if !(self.time_horizon >= 0.0) || !self.time_horizon.is_finite() {
            return Err(CoreError::Config(format!(
                "time horizon must be non-negative, got {}",
                self.time_horizon
            )));
        }
        if !(self.integrator_step > 0.0) {
            return Err(CoreError::Config(format!(
                "integrator step must be positive, got {}",
                self.integrator_step
            )));
        }
        Ok(())
    }

    /// The ascending sequence of reporting boundaries for this run.
    pub fn boundaries(&self) -> ReportingBoundaries {
        ReportingBoundaries::new(self.reporting_interval, self.time_horizon)
    }

    /// Fraction of the run completed once `time` has been reached.
    #[inline]
    pub fn progress(&self, time: f64) -> f64 {
        if self.time_horizon > 0.0 {
            (time / self.time_horizon).min(1.0)
        } else {
            1.0
        }
    }
}

// ── ReportingBoundaries ───────────────────────────────────────────────────────

/// Iterator over `interval, 2*interval, …, horizon`.
///
/// If the horizon is not an integer multiple of the interval, the final
/// boundary is the horizon itself.  A zero horizon yields nothing.
#[derive(Clone, Debug)]
pub struct ReportingBoundaries {
    interval: f64,
    horizon:  f64,
    next_k:   u64,
    count:    u64,
}

impl ReportingBoundaries {
    pub fn new(interval: f64, horizon: f64) -> Self {
        let count = if interval > 0.0 && horizon > 0.0 {
            let ratio = horizon / interval;
            (ratio - ratio * GRID_EPSILON).ceil().max(1.0) as u64
        } else {
            0
        };
        Self { interval, horizon, next_k: 1, count }
    }

    /// Total number of boundaries (independent of iteration progress).
    pub fn total(&self) -> u64 {
        self.count
    }
}

impl Iterator for ReportingBoundaries {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.next_k > self.count {
            return None;
        }
        let k = self.next_k;
        self.next_k += 1;
        if k == self.count {
            Some(self.horizon)
        } else {
            Some(k as f64 * self.interval)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.count + 1 - self.next_k) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for ReportingBoundaries {}
