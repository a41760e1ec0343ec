//! Fixed-step integrator for a leaky integrate-and-fire neuron with
//! conductance-based exponential synapses.
//!
//! ```text
//! C_m dV/dt = g_L (E_L - V) + I_syn + I_offset
//! I_syn     = Σ_k g_k (E_rev_k - V)
//! dg_k/dt   = -g_k / tau_syn_k          (g_k += w on each inlet event)
//! ```
//!
//! `V` is stepped with explicit Euler; `g_k` decays exactly.  `I_syn` is
//! algebraic and is recomputed after every step and on `reinitialize`.
//! Crossing `V_th` fires the outlet, resets `V` to `V_reset` and clamps it
//! there for `t_ref`.

use pnn_model::{BuiltinModel, Parameters};

use crate::{InletPort, Integrator, StopMode, SynapseBinding, UnitError, UnitResult};

struct Coba {
    name:    String,
    tau:     f64,
    e_rev:   f64,
    weights: Vec<f64>,
    g:       f64,
}

pub struct EulerIaf {
    unit:     String,
    c_m:      f64,
    g_l:      f64,
    e_l:      f64,
    v_th:     f64,
    v_reset:  f64,
    t_ref:    f64,
    i_offset: f64,
    step:     f64,

    t:                f64,
    v:                f64,
    i_syn:            f64,
    refractory_until: f64,
    synapses:         Vec<Coba>,
}

impl EulerIaf {
    pub fn new(
        unit:       &str,
        parameters: &Parameters,
        synapses:   &[SynapseBinding<'_>],
        step:       f64,
    ) -> UnitResult<Self> {
        let synapses = synapses
            .iter()
            .map(|s| {
                if s.model != BuiltinModel::CobaSynapse {
                    return Err(UnitError::UnsupportedModel {
                        unit:  s.name.to_owned(),
                        model: s.model,
                        role:  "synapse",
                    });
                }
                Ok(Coba {
                    name:    s.projection.to_owned(),
                    tau:     s.parameters.scalar("tau_syn")?,
                    e_rev:   s.parameters.scalar("E_rev")?,
                    weights: s.weights.to_vec(),
                    g:       0.0,
                })
            })
            .collect::<UnitResult<Vec<_>>>()?;

        let c_m = parameters.scalar("C_m")?;
        if !(c_m > 0.0) {
            return Err(UnitError::Integration {
                unit:   unit.to_owned(),
                reason: format!("membrane capacitance must be positive, got {c_m}"),
            });
        }
        if !(step > 0.0) {
            return Err(UnitError::Integration {
                unit:   unit.to_owned(),
                reason: format!("integrator step must be positive, got {step}"),
            });
        }

        let e_l = parameters.scalar("E_L")?;
        Ok(Self {
            unit: unit.to_owned(),
            c_m,
            g_l:      parameters.scalar("g_L")?,
            e_l,
            v_th:     parameters.scalar("V_th")?,
            v_reset:  parameters.scalar("V_reset")?,
            t_ref:    parameters.scalar("t_ref")?,
            i_offset: parameters.scalar("I_offset")?,
            step,
            t:                0.0,
            v:                e_l,
            i_syn:            0.0,
            refractory_until: f64::NEG_INFINITY,
            synapses,
        })
    }

    fn synaptic_current(&self) -> f64 {
        self.synapses.iter().map(|s| s.g * (s.e_rev - self.v)).sum()
    }
}

impl Integrator for EulerIaf {
    fn solve_initial(&mut self) -> UnitResult<()> {
        self.t = 0.0;
        self.v = self.e_l;
        for s in &mut self.synapses {
            s.g = 0.0;
        }
        self.i_syn = self.synaptic_current();
        Ok(())
    }

    fn integrate_until(&mut self, t: f64, mode: StopMode) -> UnitResult<Vec<f64>> {
        let mut fired = Vec::new();
        while self.t < t {
            let next = (self.t + self.step).min(t);
            let dt = next - self.t;

            if self.t >= self.refractory_until {
                let dv = (self.g_l * (self.e_l - self.v) + self.i_syn + self.i_offset) / self.c_m;
                self.v += dt * dv;
            }
            for s in &mut self.synapses {
                s.g *= (-dt / s.tau).exp();
            }
            self.t = next;

            if !self.v.is_finite() {
                return Err(UnitError::Integration {
                    unit:   self.unit.clone(),
                    reason: format!("membrane potential diverged at t = {}", self.t),
                });
            }

            if self.v >= self.v_th {
                fired.push(self.t);
                self.v = self.v_reset;
                self.refractory_until = self.t + self.t_ref;
                self.i_syn = self.synaptic_current();
                if mode == StopMode::StopAtDiscontinuity {
                    break;
                }
            } else {
                self.i_syn = self.synaptic_current();
            }
        }
        Ok(fired)
    }

    fn deliver_event(&mut self, port: InletPort) -> UnitResult<()> {
        let weight = self
            .synapses
            .get(port.synapse)
            .and_then(|s| s.weights.get(port.port))
            .copied()
            .ok_or_else(|| UnitError::UnknownPort {
                unit:    self.unit.clone(),
                synapse: port.synapse,
                port:    port.port,
            })?;
        self.synapses[port.synapse].g += weight;
        Ok(())
    }

    fn reinitialize(&mut self) -> UnitResult<()> {
        self.i_syn = self.synaptic_current();
        Ok(())
    }

    fn current_time(&self) -> f64 {
        self.t
    }

    fn variable_count(&self) -> usize {
        2 + 2 * self.synapses.len()
    }

    fn value(&self, variable: &str) -> Option<f64> {
        match variable {
            "V" => Some(self.v),
            "I_syn" => Some(self.i_syn),
            other => {
                let (syn, var) = other.rsplit_once('.')?;
                let s = self.synapses.iter().find(|s| s.name == syn)?;
                match var {
                    "g" => Some(s.g),
                    "I" => Some(s.g * (s.e_rev - self.v)),
                    _ => None,
                }
            }
        }
    }
}
