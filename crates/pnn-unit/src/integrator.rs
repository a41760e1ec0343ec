//! The `Integrator` capability and its factory.
//!
//! An integrator owns the continuous state of one neuron together with the
//! synapses attached to it.  The scheduler only ever talks to it through
//! its [`NeuronUnit`](crate::NeuronUnit).

use pnn_model::{BuiltinModel, Parameters};

use crate::{EulerIaf, InletPort, SpikeReplay, UnitError, UnitResult};

/// How `integrate_until` treats discontinuities (threshold crossings).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum StopMode {
    /// Integrate straight through to the requested time.
    #[default]
    NoStop,
    /// Return at the first discontinuity.
    StopAtDiscontinuity,
}

/// One neuron's solver.
///
/// All times are absolute simulated seconds.
pub trait Integrator: Send {
    /// Compute a consistent initial state at `t = 0`.
    fn solve_initial(&mut self) -> UnitResult<()>;

    /// Advance to `t` and return the times at which the outlet fired, in
    /// ascending order.  Does nothing if `current_time() >= t`.
    fn integrate_until(&mut self, t: f64, mode: StopMode) -> UnitResult<Vec<f64>>;

    /// Apply a spike arriving at an inlet port at the current time.
    fn deliver_event(&mut self, port: InletPort) -> UnitResult<()>;

    /// Re-derive algebraic state after an inlet changed, keeping the time.
    fn reinitialize(&mut self) -> UnitResult<()>;

    fn current_time(&self) -> f64;

    /// Number of state variables (differential and algebraic).
    fn variable_count(&self) -> usize;

    /// Current value of a named variable, if the model exposes it.
    fn value(&self, variable: &str) -> Option<f64>;
}

/// Everything an integrator needs to know about one attached synapse.
#[derive(Debug, Clone, Copy)]
pub struct SynapseBinding<'a> {
    /// Instance name, e.g. `s(p0,p1)`.
    pub name:       &'a str,
    /// Owning projection; addresses the synapse's variables (`E_I.g`).
    pub projection: &'a str,
    pub model:      BuiltinModel,
    pub parameters: &'a Parameters,
    /// One weight per inlet event port.
    pub weights:    &'a [f64],
}

/// Builds integrators for neuron units.
pub trait IntegratorFactory: Sync {
    fn build(
        &self,
        unit:       &str,
        model:      BuiltinModel,
        parameters: &Parameters,
        synapses:   &[SynapseBinding<'_>],
    ) -> UnitResult<Box<dyn Integrator>>;
}

/// Factory for the built-in models.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinIntegrators {
    /// Internal fixed step of the Euler integrator (seconds).
    pub step: f64,
}

impl BuiltinIntegrators {
    pub fn new(step: f64) -> Self {
        Self { step }
    }
}

impl IntegratorFactory for BuiltinIntegrators {
    fn build(
        &self,
        unit:       &str,
        model:      BuiltinModel,
        parameters: &Parameters,
        synapses:   &[SynapseBinding<'_>],
    ) -> UnitResult<Box<dyn Integrator>> {
        match model {
            BuiltinModel::Iaf => Ok(Box::new(EulerIaf::new(unit, parameters, synapses, self.step)?)),
            BuiltinModel::SpikeSourceArray | BuiltinModel::SpikeSourcePoisson => {
                if let Some(s) = synapses.first() {
                    return Err(UnitError::UnsupportedModel {
                        unit:  s.name.to_owned(),
                        model: s.model,
                        role:  "synapse on a spike source",
                    });
                }
                let times = parameters.array("spike_times")?.to_vec();
                Ok(Box::new(SpikeReplay::new(times)))
            }
            other => Err(UnitError::UnsupportedModel {
                unit:  unit.to_owned(),
                model: other,
                role:  "neuron",
            }),
        }
    }
}
