//! The assembled network graph.
//!
//! Neurons live in one flat `Vec<NeuronUnit>` indexed by [`NeuronId`]; a
//! population is a contiguous range of that vector.  The global index of a
//! neuron is therefore `NeuronId::index()`, which is also its row id in
//! the raster output.

use std::ops::Range;

use pnn_core::{GroupId, NeuronId, PopulationId, ProjectionId};
use pnn_model::{BuiltinModel, VariablePath};
use pnn_unit::NeuronUnit;

use crate::{NetworkError, NetworkResult};

// ── Population ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Population {
    pub id:        PopulationId,
    pub name:      String,
    pub group:     GroupId,
    /// Prototype component name.
    pub component: String,
    pub model:     BuiltinModel,
    /// Global neuron indices of the members, in population-index order.
    pub neurons:   Range<usize>,
}

impl Population {
    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    /// The neuron at population-local `index`.
    pub fn neuron(&self, index: usize) -> Option<NeuronId> {
        (index < self.len()).then(|| NeuronId((self.neurons.start + index) as u32))
    }

    pub fn ids(&self) -> impl Iterator<Item = NeuronId> + '_ {
        self.neurons.clone().map(|i| NeuronId(i as u32))
    }
}

// ── Projection ────────────────────────────────────────────────────────────────

/// The synapse a projection placed on one target neuron.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SynapseRef {
    pub neuron: NeuronId,
    /// Slot in the neuron's synapse list.
    pub slot:   usize,
}

#[derive(Debug, Clone)]
pub struct Projection {
    pub id:          ProjectionId,
    pub name:        String,
    pub group:       GroupId,
    pub source:      PopulationId,
    pub target:      PopulationId,
    /// Short name of the connection rule (`explicit`, `all_to_all`, …).
    pub rule:        &'static str,
    /// Synapse prototype component name.
    pub synapse:     String,
    /// One entry per target neuron, in target-index order.
    pub synapses:    Vec<SynapseRef>,
    pub connections: usize,
    /// Smallest delay over this projection's connections.
    pub minimal_delay: Option<f64>,
}

// ── Group ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Group {
    pub id:            GroupId,
    pub name:          String,
    pub populations:   Vec<PopulationId>,
    pub projections:   Vec<ProjectionId>,
    /// `+inf` when the group has no connections.
    pub minimal_delay: f64,
}

// ── Network ───────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Network {
    pub(crate) name:        String,
    pub(crate) neurons:     Vec<NeuronUnit>,
    pub(crate) populations: Vec<Population>,
    pub(crate) projections: Vec<Projection>,
    pub(crate) groups:      Vec<Group>,
}

impl Network {
    /// An empty network with no groups.
    pub fn empty(name: &str) -> Self {
        Self {
            name:        name.to_owned(),
            neurons:     Vec::new(),
            populations: Vec::new(),
            projections: Vec::new(),
            groups:      Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // ── Units ─────────────────────────────────────────────────────────────

    pub fn neurons(&self) -> &[NeuronUnit] {
        &self.neurons
    }

    pub fn neurons_mut(&mut self) -> &mut [NeuronUnit] {
        &mut self.neurons
    }

    pub fn neuron(&self, id: NeuronId) -> Option<&NeuronUnit> {
        self.neurons.get(id.index())
    }

    pub fn neuron_mut(&mut self, id: NeuronId) -> Option<&mut NeuronUnit> {
        self.neurons.get_mut(id.index())
    }

    pub fn neuron_count(&self) -> usize {
        self.neurons.len()
    }

    // ── Topology ──────────────────────────────────────────────────────────

    pub fn populations(&self) -> &[Population] {
        &self.populations
    }

    pub fn population(&self, id: PopulationId) -> Option<&Population> {
        self.populations.get(id.index())
    }

    pub fn population_by_name(&self, name: &str) -> Option<&Population> {
        self.populations.iter().find(|p| p.name == name)
    }

    pub fn projections(&self) -> &[Projection] {
        &self.projections
    }

    pub fn projection(&self, id: ProjectionId) -> Option<&Projection> {
        self.projections.get(id.index())
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Smallest connection delay in the whole network; `+inf` without
    /// connections.
    pub fn minimal_delay(&self) -> f64 {
        self.groups
            .iter()
            .map(|g| g.minimal_delay)
            .fold(f64::INFINITY, f64::min)
    }

    /// Number of synapse units (one per projection per target neuron).
    pub fn synapse_count(&self) -> usize {
        self.projections.iter().map(|p| p.synapses.len()).sum()
    }

    pub fn connection_count(&self) -> usize {
        self.projections.iter().map(|p| p.connections).sum()
    }

    /// Total state variables over all integrators (zero before
    /// initialization).
    pub fn equation_count(&self) -> usize {
        self.neurons.iter().map(NeuronUnit::variable_count).sum()
    }

    /// Total outlet firings recorded so far.
    pub fn spike_total(&self) -> usize {
        self.neurons.iter().map(|n| n.spikes().len()).sum()
    }

    // ── Report variables ──────────────────────────────────────────────────

    /// Map a report path to the neuron it addresses.
    ///
    /// Must be called after initialization: the variable has to be exposed
    /// by the neuron's integrator.
    pub fn resolve_variable(&self, path: &VariablePath) -> NetworkResult<NeuronId> {
        let unknown = |reason: String| NetworkError::UnknownVariable {
            path: path.to_string(),
            reason,
        };

        let group = self
            .groups
            .iter()
            .find(|g| g.name == path.group)
            .ok_or_else(|| unknown(format!("no group named {:?}", path.group)))?;
        let population = group
            .populations
            .iter()
            .filter_map(|&id| self.population(id))
            .find(|p| p.name == path.population)
            .ok_or_else(|| {
                unknown(format!("group {:?} has no population {:?}", path.group, path.population))
            })?;
        let id = population.neuron(path.index).ok_or_else(|| {
            unknown(format!("index {} out of range for population of {}", path.index, population.len()))
        })?;

        let exposed = self.neuron(id).and_then(|n| n.value(&path.variable)).is_some();
        if !exposed {
            return Err(unknown(format!("{} does not expose {:?}", population.component, path.variable)));
        }
        Ok(id)
    }
}
