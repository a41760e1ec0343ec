//! `pnn-output` — results aggregation and output writers.
//!
//! After a run, [`Results::collect`] reads every neuron's event log into a
//! time-sorted [`SpikeRaster`] and computes per-population firing rates.
//! The raster is always written as a `.ras` text file; the remaining
//! backends sit behind Cargo features:
//!
//! | Feature   | Backend     | Files created                                      |
//! |-----------|-------------|----------------------------------------------------|
//! | *(none)*  | Raster text | `<network>.ras`                                    |
//! | *(none)*  | CSV         | `reports.csv`, `spikes.csv`, `firing_rates.csv`    |
//! | `sqlite`  | SQLite      | `results.db`                                       |
//! | `png`     | PNG image   | `<network>.png`                                    |
//!
//! CSV and SQLite implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `pnn_sim::SimObserver` and
//! samples the experiment's report variables at every boundary.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pnn_output::{CsvWriter, ReportSet, Results, SimOutputObserver, write_raster};
//!
//! let reports = ReportSet::resolve(&task.reports, scheduler.network())?;
//! let mut obs = SimOutputObserver::new(CsvWriter::new(out_dir)?, reports);
//! scheduler.run(&mut obs)?;
//! let network = scheduler.finalize()?;
//! let results = Results::collect(&network, config.time_horizon);
//! write_raster(&out_dir.join("net.ras"), &results.raster)?;
//! obs.finish(&results)?;
//! ```

pub mod aggregate;
pub mod csv;
pub mod error;
pub mod observer;
pub mod raster;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "png")]
pub mod png;


pub use aggregate::{Results, SpikeRaster, firing_rates};
pub use self::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::{ReportSet, SimOutputObserver};
pub use raster::{format_time, write_raster, write_raster_to};
pub use row::{RateRow, SampleRow, SpikeRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

#[cfg(feature = "png")]
pub use png::write_raster_png;
