//! The `Scheduler` and its boundary loop.

use std::fmt;

use tracing::{debug, trace};

use pnn_core::{ReportingBoundaries, RunConfig};
use pnn_network::Network;
use pnn_unit::{Drain, EventQueue, QueueEntry};

use crate::{SimError, SimObserver, SimResult};

// ── RunStats ──────────────────────────────────────────────────────────────────

/// Counters reported at the end of a run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunStats {
    pub neurons:          usize,
    /// Synapse units, one per projection per target neuron.
    pub synapses:         usize,
    pub connections:      usize,
    /// Total state variables over all integrators.
    pub equations:        usize,
    /// Outlet firings over all neurons.
    pub spikes_fired:     usize,
    /// Events popped from the queue and delivered to an inlet port.
    pub events_delivered: u64,
    pub minimal_delay:    f64,
    /// Simulated time reached.
    pub time:             f64,
}

/// The end-of-run summary.  "Spikes" counts delivered events and
/// "synapses" counts connections.
impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of equations: {}", self.equations)?;
        writeln!(f, "Number of neurones: {}", self.neurons)?;
        writeln!(f, "Number of synapses: {}", self.connections)?;
        writeln!(f, "Number of spikes: {}", self.events_delivered)?;
        writeln!(f, "Minimal delay: {} s", self.minimal_delay)
    }
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

/// Drives every unit of a [`Network`] through the reporting boundaries,
/// delivering queued spike events between them.
///
/// For each boundary `next` in `interval, 2*interval, …, horizon`:
///
/// 1. **Drain**: pop every queued event due at or before `next`; for each,
///    integrate its target to the event time, deliver it to the inlet port
///    and reinitialize the target.
/// 2. **Advance**: integrate every unit still behind `next` up to `next`
///    (concurrently with the `parallel` feature).  Firings push new events
///    onto the queue.
/// 3. **Progress**: report `next / horizon`.
///
/// Because the minimal delay is never below the reporting interval, an
/// event produced while advancing to boundary `k` is due after boundary
/// `k`, so draining only at boundaries never misses one.
///
/// Create via [`SchedulerBuilder`][crate::SchedulerBuilder].
pub struct Scheduler {
    pub(crate) config:           RunConfig,
    pub(crate) network:          Network,
    pub(crate) queue:            EventQueue,
    pub(crate) boundaries:       ReportingBoundaries,
    /// Last boundary every unit has reached.
    pub(crate) time:             f64,
    pub(crate) events_delivered: u64,
}

impl Scheduler {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run the remaining boundaries up to the time horizon.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunStats> {
        while let Some(next) = self.boundaries.next() {
            self.process_boundary(next, observer)?;
        }
        let stats = self.stats();
        observer.on_sim_end(&stats);
        Ok(stats)
    }

    /// Run at most `n` boundaries from the current position.
    ///
    /// Useful for tests and incremental stepping.  Returns the number of
    /// boundaries actually processed.
    pub fn run_boundaries<O: SimObserver>(&mut self, n: usize, observer: &mut O) -> SimResult<usize> {
        let mut done = 0;
        while done < n {
            let Some(next) = self.boundaries.next() else { break };
            self.process_boundary(next, observer)?;
            done += 1;
        }
        Ok(done)
    }

    /// Release every unit's integrator and hand the network back for
    /// result aggregation.  Spike logs stay readable.
    pub fn finalize(mut self) -> SimResult<Network> {
        for unit in self.network.neurons_mut() {
            unit.finalize()?;
        }
        debug!(pending = self.queue.len(), "scheduler finalized");
        Ok(self.network)
    }

    pub fn stats(&self) -> RunStats {
        RunStats {
            neurons:          self.network.neuron_count(),
            synapses:         self.network.synapse_count(),
            connections:      self.network.connection_count(),
            equations:        self.network.equation_count(),
            spikes_fired:     self.network.spike_total(),
            events_delivered: self.events_delivered,
            minimal_delay:    self.network.minimal_delay(),
            time:             self.time,
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn events_delivered(&self) -> u64 {
        self.events_delivered
    }

    // ── Boundary processing ───────────────────────────────────────────────

    fn process_boundary<O: SimObserver>(&mut self, next: f64, observer: &mut O) -> SimResult<()> {
        observer.on_boundary_start(next);
        let delivered = self.drain(next, observer)?;
        let fired = self.advance(next)?;
        self.time = next;
        trace!(time = next, delivered, fired, pending = self.queue.len(), "boundary reached");

        observer.on_boundary_end(next, &self.network);
        observer.on_progress(self.config.progress(next));
        Ok(())
    }

    /// Deliver every queued event due at or before `next`.
    fn drain<O: SimObserver>(&mut self, next: f64, observer: &mut O) -> SimResult<u64> {
        let mut delivered = 0u64;
        loop {
            let entry = match self.queue.pop_due(next) {
                Drain::Due(entry) => entry,
                Drain::NotYet(_) | Drain::Empty => break,
            };
            if let Some(limit) = self.config.max_drain_events {
                if delivered >= limit {
                    return Err(SimError::DrainBound { boundary: next, limit });
                }
            }
            self.deliver(entry)?;
            delivered += 1;
            observer.on_event_delivered(&entry);
        }
        self.events_delivered += delivered;
        Ok(delivered)
    }

    fn deliver(&mut self, entry: QueueEntry) -> SimResult<()> {
        let unit = self
            .network
            .neuron_mut(entry.target)
            .ok_or(SimError::UnknownTarget(entry.target))?;
        unit.integrate_until(entry.time, &mut self.queue)?;
        unit.deliver(entry.port)?;
        unit.reinitialize()?;
        Ok(())
    }

    /// Bring every unit still behind `next` up to it.  Returns the number of
    /// outlet firings.
    #[cfg(not(feature = "parallel"))]
    fn advance(&mut self, next: f64) -> SimResult<usize> {
        let mut fired = 0;
        for unit in self.network.neurons_mut() {
            if unit.current_time() < next {
                fired += unit.integrate_until(next, &mut self.queue)?;
            }
        }
        Ok(fired)
    }

    #[cfg(feature = "parallel")]
    fn advance(&mut self, next: f64) -> SimResult<usize> {
        use pnn_unit::UnitError;
        use rayon::prelude::*;

        // Firings are replayed on this thread, in ascending neuron order.
        let fired: Vec<Vec<f64>> = self
            .network
            .neurons_mut()
            .par_iter_mut()
            .map(|unit| {
                if unit.current_time() < next {
                    unit.advance(next)
                } else {
                    Ok(Vec::new())
                }
            })
            .collect::<Result<_, UnitError>>()?;

        let mut count = 0;
        for (unit, times) in self.network.neurons_mut().iter_mut().zip(fired) {
            for time in times {
                unit.on_spike(time, &mut self.queue);
                count += 1;
            }
        }
        Ok(count)
    }
}
