//! Scheduler observer trait for progress reporting and data collection.

use pnn_network::Network;
use pnn_unit::QueueEntry;
use tracing::info;

use crate::RunStats;

/// Callbacks invoked by [`Scheduler::run`][crate::Scheduler::run] at key
/// points of the boundary loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: delivery counter
///
/// ```rust,ignore
/// struct Deliveries(usize);
///
/// impl SimObserver for Deliveries {
///     fn on_event_delivered(&mut self, _entry: &QueueEntry) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called before the drain phase of the boundary at `time`.
    fn on_boundary_start(&mut self, _time: f64) {}

    /// Called after an event was delivered and its target reinitialized.
    fn on_event_delivered(&mut self, _entry: &QueueEntry) {}

    /// Called once every unit has reached `time`.
    ///
    /// Provides read-only access to the network so that report writers can
    /// sample variables without the scheduler knowing about any format.
    fn on_boundary_end(&mut self, _time: f64, _network: &Network) {}

    /// Fraction of the run completed, in `(0, 1]`.
    fn on_progress(&mut self, _fraction: f64) {}

    /// Called once after the last boundary.
    fn on_sim_end(&mut self, _stats: &RunStats) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Logs progress through `tracing` every `step` of the run (`0.1` = every
/// 10 %), and the final statistics.
pub struct ProgressLogger {
    step:   f64,
    logged: f64,
}

impl ProgressLogger {
    pub fn new(step: f64) -> Self {
        Self { step, logged: 0.0 }
    }
}

impl Default for ProgressLogger {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl SimObserver for ProgressLogger {
    fn on_progress(&mut self, fraction: f64) {
        if fraction >= 1.0 || fraction - self.logged >= self.step {
            self.logged = fraction;
            info!(progress = format_args!("{:.1}%", 100.0 * fraction), "simulating");
        }
    }

    fn on_sim_end(&mut self, stats: &RunStats) {
        info!(
            neurons        = stats.neurons,
            synapses       = stats.synapses,
            connections    = stats.connections,
            equations      = stats.equations,
            spikes         = stats.spikes_fired,
            delivered      = stats.events_delivered,
            minimal_delay  = stats.minimal_delay,
            "simulation finished"
        );
    }
}
