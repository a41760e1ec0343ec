//! Neuron and synapse simulation units.
//!
//! # Ownership
//!
//! A [`NeuronUnit`] owns its integrator and the [`SynapseUnit`]s of every
//! projection that targets it (one per projection).  The synapses are
//! co-integrated by the neuron's integrator, so their lifecycle state
//! follows the neuron's.  Each synapse keeps its owner's [`NeuronId`] and
//! the neuron addresses it by slot index, which links the two in both
//! directions without shared references.
//!
//! # Lifecycle
//!
//! ```text
//! Built ──setup──▶ ParametersBound ──initialize──▶ Initialized
//!                                                    │
//!                        ┌──── integrate ◀───────────┤
//!                        ▼                           │
//!                   Integrating ──deliver──▶ EventDelivered
//!                        ▲                           │
//!                        └──────── reinitialize ─────┘
//!
//! any state ──finalize──▶ Finalized   (terminal)
//! ```

use std::fmt;

use pnn_core::{NeuronId, ProjectionId};
use pnn_model::{BuiltinModel, Parameters};

use crate::{
    EventQueue, InletPort, Integrator, IntegratorFactory, QueueEntry, StopMode, SynapseBinding,
    UnitError, UnitResult,
};

// ── UnitState ─────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnitState {
    Built,
    ParametersBound,
    Initialized,
    Integrating,
    EventDelivered,
    Finalized,
}

impl fmt::Display for UnitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnitState::Built           => "built",
            UnitState::ParametersBound => "parameters bound",
            UnitState::Initialized     => "initialized",
            UnitState::Integrating     => "integrating",
            UnitState::EventDelivered  => "event delivered",
            UnitState::Finalized       => "finalized",
        };
        f.write_str(s)
    }
}

// ── Destination / SpikeRecord ─────────────────────────────────────────────────

/// One downstream delivery reachable from a neuron's outlet.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Destination {
    pub port:   InletPort,
    pub delay:  f64,
    pub target: NeuronId,
}

/// One outlet firing in a neuron's event log.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpikeRecord {
    pub time:    f64,
    /// Number of deliveries scheduled for this spike.
    pub fan_out: usize,
}

// ── SynapseUnit ───────────────────────────────────────────────────────────────

/// The synapse a projection places on one target neuron.
///
/// Every connection of the projection into that neuron gets its own inlet
/// event port; the port index addresses the connection's weight.
pub struct SynapseUnit {
    name:       String,
    projection: ProjectionId,
    label:      String,
    owner:      NeuronId,
    model:      BuiltinModel,
    state:      UnitState,
    parameters: Option<Parameters>,
    weights:    Vec<f64>,
}

impl SynapseUnit {
    /// `label` is the projection name; it prefixes the synapse's variables.
    pub fn new(
        name:       String,
        projection: ProjectionId,
        label:      &str,
        owner:      NeuronId,
        model:      BuiltinModel,
    ) -> Self {
        Self {
            name,
            projection,
            label: label.to_owned(),
            owner,
            model,
            state: UnitState::Built,
            parameters: None,
            weights: Vec::new(),
        }
    }

    /// Add one incoming connection; returns its inlet port index.
    pub fn add_connection(&mut self, weight: f64) -> usize {
        self.weights.push(weight);
        self.weights.len() - 1
    }

    /// Bind parameters once all connections are known.
    pub fn setup(&mut self, parameters: Parameters) -> UnitResult<()> {
        if self.state != UnitState::Built {
            return Err(UnitError::IllegalTransition {
                unit:   self.name.clone(),
                from:   self.state,
                action: "bind parameters",
            });
        }
        self.parameters = Some(parameters);
        self.state = UnitState::ParametersBound;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn projection(&self) -> ProjectionId {
        self.projection
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn owner(&self) -> NeuronId {
        self.owner
    }

    pub fn model(&self) -> BuiltinModel {
        self.model
    }

    pub fn state(&self) -> UnitState {
        self.state
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Number of live connections (= inlet ports).
    pub fn connection_count(&self) -> usize {
        self.weights.len()
    }
}

// ── NeuronUnit ────────────────────────────────────────────────────────────────

pub struct NeuronUnit {
    id:           NeuronId,
    name:         String,
    model:        BuiltinModel,
    state:        UnitState,
    parameters:   Option<Parameters>,
    integrator:   Option<Box<dyn Integrator>>,
    synapses:     Vec<SynapseUnit>,
    destinations: Vec<Destination>,
    spikes:       Vec<SpikeRecord>,
}

impl NeuronUnit {
    pub fn new(id: NeuronId, name: String, model: BuiltinModel) -> Self {
        Self {
            id,
            name,
            model,
            state:        UnitState::Built,
            parameters:   None,
            integrator:   None,
            synapses:     Vec::new(),
            destinations: Vec::new(),
            spikes:       Vec::new(),
        }
    }

    // ── Assembly ──────────────────────────────────────────────────────────

    /// Bind the neuron's own parameters.
    pub fn setup(&mut self, parameters: Parameters) -> UnitResult<()> {
        self.require(&[UnitState::Built], "bind parameters")?;
        self.parameters = Some(parameters);
        self.state = UnitState::ParametersBound;
        Ok(())
    }

    /// Take ownership of a synapse targeting this neuron; returns its slot.
    pub fn attach_synapse(&mut self, synapse: SynapseUnit) -> UnitResult<usize> {
        self.require(&[UnitState::Built, UnitState::ParametersBound], "attach a synapse")?;
        self.synapses.push(synapse);
        Ok(self.synapses.len() - 1)
    }

    /// Add one incoming connection on synapse `slot`; returns the inlet
    /// port that now carries `weight`.
    pub fn add_inlet(&mut self, slot: usize, weight: f64) -> UnitResult<InletPort> {
        self.require(&[UnitState::Built, UnitState::ParametersBound], "add a connection")?;
        let synapse = self.synapses.get_mut(slot).ok_or_else(|| UnitError::UnknownPort {
            unit:    self.name.clone(),
            synapse: slot,
            port:    0,
        })?;
        let port = synapse.add_connection(weight);
        Ok(InletPort { synapse: slot, port })
    }

    /// Bind the parameters of synapse `slot` once its connections are known.
    pub fn setup_synapse(&mut self, slot: usize, parameters: Parameters) -> UnitResult<()> {
        match self.synapses.get_mut(slot) {
            Some(s) => s.setup(parameters),
            None => Err(UnitError::UnknownPort { unit: self.name.clone(), synapse: slot, port: 0 }),
        }
    }

    pub fn add_destination(&mut self, destination: Destination) {
        self.destinations.push(destination);
    }

    /// Build the integrator, solve for a consistent initial state and drop
    /// the setup-only parameter copies.
    pub fn initialize_and_solve_initial(&mut self, factory: &dyn IntegratorFactory) -> UnitResult<()> {
        self.require(&[UnitState::ParametersBound], "initialize")?;
        if let Some(s) = self.synapses.iter().find(|s| s.state != UnitState::ParametersBound) {
            return Err(UnitError::IllegalTransition {
                unit:   s.name.clone(),
                from:   s.state,
                action: "initialize",
            });
        }

        let empty = Parameters::default();
        let bindings: Vec<SynapseBinding<'_>> = self
            .synapses
            .iter()
            .map(|s| SynapseBinding {
                name:       &s.name,
                projection: &s.label,
                model:      s.model,
                parameters: s.parameters.as_ref().unwrap_or(&empty),
                weights:    &s.weights,
            })
            .collect();
        let parameters = self.parameters.as_ref().unwrap_or(&empty);

        let mut integrator = factory.build(&self.name, self.model, parameters, &bindings)?;
        integrator.solve_initial()?;

        self.integrator = Some(integrator);
        self.parameters = None;
        for s in &mut self.synapses {
            s.parameters = None;
        }
        self.set_state(UnitState::Initialized);
        tracing::trace!(unit = %self.name, "initialized");
        Ok(())
    }

    // ── Simulation ────────────────────────────────────────────────────────

    /// Integrate to `t` and return the outlet firing times without touching
    /// the event log or any queue.  Pair with [`on_spike`](Self::on_spike).
    pub fn advance(&mut self, t: f64) -> UnitResult<Vec<f64>> {
        self.require(
            &[UnitState::Initialized, UnitState::Integrating],
            "integrate",
        )?;
        self.set_state(UnitState::Integrating);
        let integrator = self.integrator_mut()?;
        if integrator.current_time() >= t {
            return Ok(Vec::new());
        }
        integrator.integrate_until(t, StopMode::NoStop)
    }

    /// Integrate to `t`, pushing every resulting spike delivery onto
    /// `queue`.  Returns the number of outlet firings.
    pub fn integrate_until(&mut self, t: f64, queue: &mut EventQueue) -> UnitResult<usize> {
        let fired = self.advance(t)?;
        for &time in &fired {
            self.on_spike(time, queue);
        }
        Ok(fired.len())
    }

    /// Record an outlet firing and schedule one delivery per destination.
    pub fn on_spike(&mut self, time: f64, queue: &mut EventQueue) {
        for d in &self.destinations {
            queue.push(QueueEntry { time: time + d.delay, port: d.port, target: d.target });
        }
        self.spikes.push(SpikeRecord { time, fan_out: self.destinations.len() });
    }

    /// Apply a delivered spike to one of this neuron's inlet ports.
    pub fn deliver(&mut self, port: InletPort) -> UnitResult<()> {
        self.require(&[UnitState::Initialized, UnitState::Integrating], "deliver an event")?;
        let known = self
            .synapses
            .get(port.synapse)
            .is_some_and(|s| port.port < s.connection_count());
        if !known {
            return Err(UnitError::UnknownPort {
                unit:    self.name.clone(),
                synapse: port.synapse,
                port:    port.port,
            });
        }
        self.integrator_mut()?.deliver_event(port)?;
        self.set_state(UnitState::EventDelivered);
        Ok(())
    }

    pub fn reinitialize(&mut self) -> UnitResult<()> {
        self.require(&[UnitState::EventDelivered], "reinitialize")?;
        self.integrator_mut()?.reinitialize()?;
        self.set_state(UnitState::Integrating);
        Ok(())
    }

    /// Release the integrator.  No further transition is possible.
    pub fn finalize(&mut self) -> UnitResult<()> {
        if self.state == UnitState::Finalized {
            return Err(self.illegal("finalize"));
        }
        self.integrator = None;
        self.parameters = None;
        self.set_state(UnitState::Finalized);
        Ok(())
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn id(&self) -> NeuronId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> BuiltinModel {
        self.model
    }

    pub fn state(&self) -> UnitState {
        self.state
    }

    /// Integrator time, or `0.0` before initialization and after
    /// finalization.
    pub fn current_time(&self) -> f64 {
        self.integrator.as_ref().map_or(0.0, |i| i.current_time())
    }

    pub fn variable_count(&self) -> usize {
        self.integrator.as_ref().map_or(0, |i| i.variable_count())
    }

    pub fn value(&self, variable: &str) -> Option<f64> {
        self.integrator.as_ref()?.value(variable)
    }

    pub fn synapses(&self) -> &[SynapseUnit] {
        &self.synapses
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    /// The event log: every outlet firing, in time order.
    pub fn spikes(&self) -> &[SpikeRecord] {
        &self.spikes
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn require(&self, allowed: &[UnitState], action: &'static str) -> UnitResult<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(self.illegal(action))
        }
    }

    fn illegal(&self, action: &'static str) -> UnitError {
        UnitError::IllegalTransition { unit: self.name.clone(), from: self.state, action }
    }

    fn set_state(&mut self, state: UnitState) {
        self.state = state;
        for s in &mut self.synapses {
            s.state = state;
        }
    }

    fn integrator_mut(&mut self) -> UnitResult<&mut Box<dyn Integrator>> {
        let name = &self.name;
        self.integrator.as_mut().ok_or_else(|| UnitError::Integration {
            unit:   name.clone(),
            reason: "integrator has not been built".to_owned(),
        })
    }
}

impl fmt::Debug for NeuronUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NeuronUnit")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("model", &self.model)
            .field("state", &self.state)
            .field("synapses", &self.synapses.len())
            .field("destinations", &self.destinations.len())
            .field("spikes", &self.spikes.len())
            .finish()
    }
}
