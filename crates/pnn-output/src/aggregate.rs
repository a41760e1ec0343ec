//! Results aggregation: the network-wide spike raster and per-population
//! firing rates.

use tracing::info;

use pnn_network::Network;

use crate::{RateRow, SpikeRow};

// ── SpikeRaster ───────────────────────────────────────────────────────────────

/// Every outlet firing of a run as `(time, global neuron index)`, sorted by
/// time, then by index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpikeRaster {
    size:    usize,
    entries: Vec<SpikeRow>,
}

impl SpikeRaster {
    /// Collect the event logs of every neuron.
    pub fn from_network(network: &Network) -> Self {
        let mut entries: Vec<SpikeRow> = network
            .populations()
            .iter()
            .flat_map(|p| {
                p.ids().flat_map(move |id| {
                    network
                        .neuron(id)
                        .into_iter()
                        .flat_map(|n| n.spikes())
                        .map(move |s| SpikeRow { time: s.time, neuron: id.0, population: p.id.0 })
                })
            })
            .collect();
        entries.sort_by(|a, b| a.time.total_cmp(&b.time).then(a.neuron.cmp(&b.neuron)));
        Self { size: network.neuron_count(), entries }
    }

    /// Number of neurons in the network (not the number of spikes).
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[SpikeRow] {
        &self.entries
    }
}

// ── Firing rates ──────────────────────────────────────────────────────────────

/// Average firing rate of every population: `spikes / (horizon * size)`.
///
/// Empty populations and a zero horizon report `0.0`.
pub fn firing_rates(network: &Network, horizon: f64) -> Vec<RateRow> {
    network
        .populations()
        .iter()
        .map(|p| {
            let spikes: usize = p
                .ids()
                .filter_map(|id| network.neuron(id))
                .map(|n| n.spikes().len())
                .sum();
            let rate = if p.is_empty() || horizon <= 0.0 {
                0.0
            } else {
                spikes as f64 / (horizon * p.len() as f64)
            };
            RateRow { population: p.name.clone(), neurons: p.len(), spikes, rate }
        })
        .collect()
}

// ── Results ───────────────────────────────────────────────────────────────────

/// Everything collected from a finished run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Results {
    pub raster: SpikeRaster,
    pub rates:  Vec<RateRow>,
}

impl Results {
    pub fn collect(network: &Network, horizon: f64) -> Self {
        let results = Self {
            raster: SpikeRaster::from_network(network),
            rates:  firing_rates(network, horizon),
        };
        for r in &results.rates {
            info!(population = %r.population, spikes = r.spikes, rate_hz = r.rate, "average firing rate");
        }
        results
    }
}
