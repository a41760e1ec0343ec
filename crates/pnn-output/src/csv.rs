//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `reports.csv`: `time, variable, value`, one row per sample
//! - `spikes.csv`: `time, neuron, population`
//! - `firing_rates.csv`: `population, neurons, spikes, rate_hz`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OutputResult, RateRow, SampleRow, SpikeRow};

/// Writes simulation output to CSV files.
pub struct CsvWriter {
    reports:  Writer<File>,
    spikes:   Writer<File>,
    rates:    Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Create the CSV files in `dir` and write their header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut reports = Writer::from_path(dir.join("reports.csv"))?;
        reports.write_record(["time", "variable", "value"])?;

        let mut spikes = Writer::from_path(dir.join("spikes.csv"))?;
        spikes.write_record(["time", "neuron", "population"])?;

        let mut rates = Writer::from_path(dir.join("firing_rates.csv"))?;
        rates.write_record(["population", "neurons", "spikes", "rate_hz"])?;

        Ok(Self { reports, spikes, rates, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_samples(&mut self, rows: &[SampleRow]) -> OutputResult<()> {
        for row in rows {
            self.reports.write_record(&[
                row.time.to_string(),
                row.variable.clone(),
                row.value.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_spikes(&mut self, rows: &[SpikeRow]) -> OutputResult<()> {
        for row in rows {
            self.spikes.write_record(&[
                row.time.to_string(),
                row.neuron.to_string(),
                row.population.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_rates(&mut self, rows: &[RateRow]) -> OutputResult<()> {
        for row in rows {
            self.rates.write_record(&[
                row.population.clone(),
                row.neurons.to_string(),
                row.spikes.to_string(),
                row.rate.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.reports.flush()?;
        self.spikes.flush()?;
        self.rates.flush()?;
        Ok(())
    }
}
