//! The `OutputWriter` trait implemented by all backend writers.

use crate::{OutputResult, RateRow, SampleRow, SpikeRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// Errors raised while the scheduler runs are stored by
/// [`SimOutputObserver`](crate::SimOutputObserver) and retrieved with
/// [`take_error`](crate::SimOutputObserver::take_error).
pub trait OutputWriter {
    /// Write the report samples of one boundary.
    fn write_samples(&mut self, rows: &[SampleRow]) -> OutputResult<()>;

    /// Write the sorted spike list.
    fn write_spikes(&mut self, rows: &[SpikeRow]) -> OutputResult<()>;

    /// Write per-population firing rates.
    fn write_rates(&mut self, rows: &[RateRow]) -> OutputResult<()>;

    /// Flush and close all underlying handles.  Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
