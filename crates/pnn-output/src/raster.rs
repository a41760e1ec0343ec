//! Raster text files (`.ras`).
//!
//! ```text
//! # size = 2
//! # first_index = 0
//! # first_id = 0
//! # n = 1
//! # variable = spikes
//! # last_id = 1
//! # dt = 0.0
//! # label = spikes
//! 3.00000000000000e-02	0
//! ```
//!
//! One header line per field, then one `time<TAB>index` line per spike.
//! Times use 14 fractional digits and a signed exponent of at least two
//! digits.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::{OutputResult, SpikeRaster};

/// Write `raster` to `path`, replacing any existing file.
pub fn write_raster(path: &Path, raster: &SpikeRaster) -> OutputResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_raster_to(&mut out, raster)?;
    out.flush()?;
    Ok(())
}

pub fn write_raster_to<W: Write>(out: &mut W, raster: &SpikeRaster) -> OutputResult<()> {
    let size = raster.size();
    writeln!(out, "# size = {size}")?;
    writeln!(out, "# first_index = 0")?;
    writeln!(out, "# first_id = 0")?;
    writeln!(out, "# n = {}", raster.len())?;
    writeln!(out, "# variable = spikes")?;
    writeln!(out, "# last_id = {}", size as i64 - 1)?;
    writeln!(out, "# dt = {:?}", 0.0_f64)?;
    writeln!(out, "# label = spikes")?;
    for row in raster.entries() {
        writeln!(out, "{}\t{}", format_time(row.time), row.neuron)?;
    }
    Ok(())
}

/// `3.00000000000000e-02` for `0.03`.
pub fn format_time(t: f64) -> String {
    let s = format!("{t:.14e}");
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => s,
    }
}
