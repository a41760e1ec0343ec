//! Plain data row types written by output backends.

/// One outlet firing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpikeRow {
    pub time:       f64,
    /// Global neuron index (raster row).
    pub neuron:     u32,
    pub population: u32,
}

/// Average firing rate of one population over the whole run.
#[derive(Debug, Clone, PartialEq)]
pub struct RateRow {
    pub population: String,
    pub neurons:    usize,
    pub spikes:     usize,
    /// `spikes / (horizon * neurons)` in Hz.
    pub rate:       f64,
}

/// One report variable sampled at a reporting boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    pub time:     f64,
    /// `Group.Population[index].variable`
    pub variable: String,
    pub value:    f64,
}
