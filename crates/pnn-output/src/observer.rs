//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use pnn_core::NeuronId;
use pnn_model::VariablePath;
use pnn_network::Network;
use pnn_sim::{RunStats, SimObserver};
use tracing::debug;

use crate::row::SampleRow;
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult, Results};

// ── Report variables ──────────────────────────────────────────────────────────

/// Report variables resolved against an initialized network.
#[derive(Debug, Clone, Default)]
pub struct ReportSet {
    variables: Vec<(String, NeuronId, String)>,
}

impl ReportSet {
    /// Parse and resolve `Group.Population[index].variable` paths.
    pub fn resolve<S: AsRef<str>>(paths: &[S], network: &Network) -> OutputResult<Self> {
        let mut variables = Vec::with_capacity(paths.len());
        for p in paths {
            let path: VariablePath = p.as_ref().parse()?;
            let neuron = network.resolve_variable(&path)?;
            variables.push((path.to_string(), neuron, path.variable));
        }
        debug!(variables = variables.len(), "report variables resolved");
        Ok(Self { variables })
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Current value of every report variable.
    pub fn sample(&self, time: f64, network: &Network) -> Vec<SampleRow> {
        self.variables
            .iter()
            .filter_map(|(label, id, variable)| {
                let value = network.neuron(*id)?.value(variable)?;
                Some(SampleRow { time, variable: label.clone(), value })
            })
            .collect()
    }
}

// ── SimOutputObserver ─────────────────────────────────────────────────────────

/// A [`SimObserver`] that writes report samples at every boundary to any
/// [`OutputWriter`] backend (CSV, SQLite, …).
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `scheduler.run()` returns, check for errors
/// with [`take_error`][Self::take_error], then hand over the aggregated
/// results with [`finish`][Self::finish].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    reports:    ReportSet,
    samples:    usize,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W, reports: ReportSet) -> Self {
        Self { writer, reports, samples: 0, last_error: None }
    }

    /// Record the report variables at `time` outside the boundary loop
    /// (e.g. the initial state at `t = 0`).
    pub fn record(&mut self, time: f64, network: &Network) {
        let rows = self.reports.sample(time, network);
        if !rows.is_empty() {
            self.samples += rows.len();
            let result = self.writer.write_samples(&rows);
            self.store_err(result);
        }
    }

    /// Number of sample rows written so far.
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Take the stored write error (if any) after `scheduler.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Write the aggregated spikes and rates, flush the writer and return it.
    pub fn finish(mut self, results: &Results) -> OutputResult<W> {
        if let Some(e) = self.last_error.take() {
            return Err(e);
        }
        self.writer.write_spikes(results.raster.entries())?;
        self.writer.write_rates(&results.rates)?;
        self.writer.finish()?;
        Ok(self.writer)
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_boundary_end(&mut self, time: f64, network: &Network) {
        self.record(time, network);
    }

    fn on_sim_end(&mut self, stats: &RunStats) {
        debug!(samples = self.samples, time = stats.time, "report sampling finished");
    }
}
