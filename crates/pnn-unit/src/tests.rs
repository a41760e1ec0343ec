//! Unit tests for pnn-unit.

use pnn_core::{NeuronId, ProjectionId, SimRng};
use pnn_model::{BuiltinModel, Parameters};

use crate::{
    BuiltinIntegrators, Destination, Drain, EulerIaf, EventQueue, InletPort, Integrator,
    NeuronUnit, QueueEntry, SpikeReplay, StopMode, SynapseBinding, SynapseUnit, UnitError,
    UnitState, poisson_spike_times,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const STEP: f64 = 1e-5;

fn iaf_params(i_offset: f64) -> Parameters {
    Parameters::new("exc")
        .with_scalar("C_m", 0.2e-9)
        .with_scalar("g_L", 10e-9)
        .with_scalar("E_L", -0.07)
        .with_scalar("V_th", -0.05)
        .with_scalar("V_reset", -0.06)
        .with_scalar("t_ref", 0.002)
        .with_scalar("I_offset", i_offset)
}

fn coba_params() -> Parameters {
    Parameters::new("ampa").with_scalar("tau_syn", 0.005).with_scalar("E_rev", 0.0)
}

fn entry(time: f64, target: u32) -> QueueEntry {
    QueueEntry { time, port: InletPort { synapse: 0, port: 0 }, target: NeuronId(target) }
}

fn source_unit(id: u32, times: Vec<f64>) -> NeuronUnit {
    let mut unit = NeuronUnit::new(NeuronId(id), format!("p0({id:04})"), BuiltinModel::SpikeSourceArray);
    unit.setup(Parameters::new("src").with_array("spike_times", times)).unwrap();
    unit
}

fn iaf_unit_with_synapse(weight: f64) -> NeuronUnit {
    let mut unit = NeuronUnit::new(NeuronId(1), "p1(0000)".to_owned(), BuiltinModel::Iaf);
    unit.setup(iaf_params(0.0)).unwrap();
    let mut syn = SynapseUnit::new(
        "s(p0,p1)".to_owned(),
        ProjectionId(0),
        "A_B",
        NeuronId(1),
        BuiltinModel::CobaSynapse,
    );
    assert_eq!(syn.add_connection(weight), 0);
    syn.setup(coba_params()).unwrap();
    assert_eq!(unit.attach_synapse(syn).unwrap(), 0);
    unit
}

// ── EventQueue ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod queue {
    use super::*;

    #[test]
    fn earliest_first_ties_in_push_order() {
        let mut q = EventQueue::new();
        q.push(entry(5.0, 0)); // A
        q.push(entry(3.0, 1)); // B
        q.push(entry(5.0, 2)); // C

        let order: Vec<u32> = std::iter::from_fn(|| match q.pop_due(10.0) {
            Drain::Due(e) => Some(e.target.0),
            _ => None,
        })
        .collect();
        assert_eq!(order, vec![1, 0, 2]);
        assert!(q.is_empty());
    }

    #[test]
    fn pop_due_leaves_future_entries() {
        let mut q = EventQueue::new();
        q.push(entry(0.05, 0));
        assert_eq!(q.pop_due(0.04), Drain::NotYet(0.05));
        assert_eq!(q.len(), 1);
        assert!(matches!(q.pop_due(0.05), Drain::Due(e) if e.time == 0.05));
        assert_eq!(q.pop_due(1.0), Drain::Empty);
    }

    #[test]
    fn counts_pushes() {
        let mut q = EventQueue::new();
        q.push(entry(1.0, 0));
        q.push(entry(2.0, 0));
        assert_eq!(q.total_pushed(), 2);
        assert_eq!(q.peek_time(), Some(1.0));
    }
}

// ── Integrators ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod integrators {
    use super::*;

    #[test]
    fn iaf_rests_without_input() {
        let mut iaf = EulerIaf::new("n", &iaf_params(0.0), &[], STEP).unwrap();
        iaf.solve_initial().unwrap();
        let fired = iaf.integrate_until(0.05, StopMode::NoStop).unwrap();
        assert!(fired.is_empty());
        assert_eq!(iaf.current_time(), 0.05);
        assert!((iaf.value("V").unwrap() + 0.07).abs() < 1e-12);
    }

    #[test]
    fn iaf_fires_under_constant_current() {
        let mut iaf = EulerIaf::new("n", &iaf_params(0.5e-9), &[], STEP).unwrap();
        iaf.solve_initial().unwrap();
        let fired = iaf.integrate_until(0.1, StopMode::NoStop).unwrap();
        assert!(fired.len() >= 3, "fired {fired:?}");
        assert!(fired.windows(2).all(|w| w[0] < w[1]));
        assert!(fired.iter().all(|&t| t > 0.0 && t <= 0.1));
        // First crossing of a 20 ms membrane towards -20 mV: ~10.2 ms.
        assert!((fired[0] - 0.0102).abs() < 5e-4);
    }

    #[test]
    fn iaf_stop_at_discontinuity_returns_first_spike() {
        let mut iaf = EulerIaf::new("n", &iaf_params(0.5e-9), &[], STEP).unwrap();
        iaf.solve_initial().unwrap();
        let fired = iaf.integrate_until(0.1, StopMode::StopAtDiscontinuity).unwrap();
        assert_eq!(fired.len(), 1);
        assert_eq!(iaf.current_time(), fired[0]);
    }

    #[test]
    fn iaf_event_raises_conductance_and_current() {
        let params = coba_params();
        let weights = [10e-9];
        let binding = SynapseBinding {
            name:       "s(p0,p1)",
            projection: "A_B",
            model:      BuiltinModel::CobaSynapse,
            parameters: &params,
            weights:    &weights,
        };
        let mut iaf = EulerIaf::new("n", &iaf_params(0.0), &[binding], STEP).unwrap();
        iaf.solve_initial().unwrap();
        assert_eq!(iaf.variable_count(), 4);
        assert_eq!(iaf.value("I_syn"), Some(0.0));

        iaf.deliver_event(InletPort { synapse: 0, port: 0 }).unwrap();
        iaf.reinitialize().unwrap();
        assert_eq!(iaf.value("A_B.g"), Some(10e-9));
        assert!(iaf.value("I_syn").unwrap() > 0.0);
        assert_eq!(iaf.current_time(), 0.0);

        assert!(matches!(
            iaf.deliver_event(InletPort { synapse: 0, port: 1 }),
            Err(UnitError::UnknownPort { .. })
        ));
        assert_eq!(iaf.value("A_B.x"), None);
    }

    #[test]
    fn iaf_rejects_non_coba_synapse() {
        let params = Parameters::new("x");
        let binding = SynapseBinding {
            name:       "s",
            projection: "P",
            model:      BuiltinModel::Iaf,
            parameters: &params,
            weights:    &[],
        };
        assert!(matches!(
            EulerIaf::new("n", &iaf_params(0.0), &[binding], STEP),
            Err(UnitError::UnsupportedModel { .. })
        ));
    }

    #[test]
    fn replay_emits_due_spikes_once() {
        let mut r = SpikeReplay::new(vec![0.03, 0.0, 0.07]);
        r.solve_initial().unwrap();
        assert_eq!(r.integrate_until(0.01, StopMode::NoStop).unwrap(), vec![0.0]);
        assert_eq!(r.integrate_until(0.05, StopMode::NoStop).unwrap(), vec![0.03]);
        assert!(r.integrate_until(0.05, StopMode::NoStop).unwrap().is_empty());
        assert_eq!(r.integrate_until(0.1, StopMode::NoStop).unwrap(), vec![0.07]);
        assert_eq!(r.current_time(), 0.1);
        assert_eq!(r.variable_count(), 0);
    }

    #[test]
    fn replay_stop_mode() {
        let mut r = SpikeReplay::new(vec![0.02, 0.04]);
        assert_eq!(r.integrate_until(0.1, StopMode::StopAtDiscontinuity).unwrap(), vec![0.02]);
        assert_eq!(r.current_time(), 0.02);
        assert_eq!(r.integrate_until(0.1, StopMode::NoStop).unwrap(), vec![0.04]);
    }

    #[test]
    fn poisson_times_within_window_and_deterministic() {
        let a = poisson_spike_times(100.0, 1.0, 0.5, SimRng::new(3).inner());
        let b = poisson_spike_times(100.0, 1.0, 0.5, SimRng::new(3).inner());
        assert_eq!(a, b);
        assert!(!a.is_empty());
        assert!(a.iter().all(|&t| t > 0.5 && t <= 1.5));
        assert!(a.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn poisson_zero_rate_is_silent() {
        assert!(poisson_spike_times(0.0, 1.0, 0.0, SimRng::new(0).inner()).is_empty());
        assert!(poisson_spike_times(10.0, 0.0, 0.0, SimRng::new(0).inner()).is_empty());
    }

    #[test]
    fn poisson_huge_rate_over_tiny_window() {
        let times = poisson_spike_times(1e12, 1e-9, 0.0, SimRng::new(11).inner());
        assert!((800..1200).contains(&times.len()));
        assert!(times.iter().all(|&t| t > 0.0 && t <= 1e-9));
    }

    #[test]
    fn factory_rejects_connection_model_as_neuron() {
        use crate::IntegratorFactory;
        let err = BuiltinIntegrators::new(STEP)
            .build("p0(0000)", BuiltinModel::AllToAll, &Parameters::new("x"), &[])
            .err()
            .unwrap();
        assert!(matches!(err, UnitError::UnsupportedModel { role: "neuron", .. }));
    }
}

// ── Units ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod units {
    use super::*;

    #[test]
    fn spike_pushes_one_entry_per_destination() {
        let mut unit = source_unit(0, vec![0.03]);
        unit.add_destination(Destination {
            port:   InletPort { synapse: 0, port: 0 },
            delay:  0.02,
            target: NeuronId(1),
        });
        unit.add_destination(Destination {
            port:   InletPort { synapse: 1, port: 3 },
            delay:  0.04,
            target: NeuronId(2),
        });
        unit.initialize_and_solve_initial(&BuiltinIntegrators::new(STEP)).unwrap();

        let mut queue = EventQueue::new();
        assert_eq!(unit.integrate_until(0.05, &mut queue).unwrap(), 1);
        assert_eq!(queue.len(), 2);
        assert_eq!(unit.spikes().len(), 1);
        assert_eq!(unit.spikes()[0].time, 0.03);
        assert_eq!(unit.spikes()[0].fan_out, 2);

        match queue.pop_due(1.0) {
            Drain::Due(e) => {
                assert_eq!(e.time, 0.03 + 0.02);
                assert_eq!(e.target, NeuronId(1));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn integrate_until_same_time_is_idempotent() {
        let mut unit = iaf_unit_with_synapse(1e-9);
        unit.initialize_and_solve_initial(&BuiltinIntegrators::new(STEP)).unwrap();
        let mut queue = EventQueue::new();

        unit.integrate_until(0.02, &mut queue).unwrap();
        let v = unit.value("V");
        let state = unit.state();
        assert_eq!(unit.integrate_until(0.02, &mut queue).unwrap(), 0);
        assert_eq!(unit.value("V"), v);
        assert_eq!(unit.state(), state);
        assert_eq!(unit.current_time(), 0.02);
        assert!(queue.is_empty());
    }

    #[test]
    fn full_lifecycle() {
        let mut unit = iaf_unit_with_synapse(5e-9);
        assert_eq!(unit.state(), UnitState::ParametersBound);
        unit.initialize_and_solve_initial(&BuiltinIntegrators::new(STEP)).unwrap();
        assert_eq!(unit.state(), UnitState::Initialized);
        assert_eq!(unit.synapses()[0].state(), UnitState::Initialized);
        assert_eq!(unit.variable_count(), 4);

        let mut queue = EventQueue::new();
        unit.integrate_until(0.01, &mut queue).unwrap();
        assert_eq!(unit.state(), UnitState::Integrating);

        unit.deliver(InletPort { synapse: 0, port: 0 }).unwrap();
        assert_eq!(unit.state(), UnitState::EventDelivered);
        assert!(matches!(
            unit.integrate_until(0.02, &mut queue),
            Err(UnitError::IllegalTransition { .. })
        ));

        unit.reinitialize().unwrap();
        assert_eq!(unit.state(), UnitState::Integrating);
        assert_eq!(unit.current_time(), 0.01);

        unit.finalize().unwrap();
        assert_eq!(unit.state(), UnitState::Finalized);
        assert_eq!(unit.synapses()[0].state(), UnitState::Finalized);
        assert!(unit.integrate_until(0.03, &mut queue).is_err());
        assert!(unit.finalize().is_err());
    }

    #[test]
    fn initialize_requires_bound_parameters() {
        let mut unit = NeuronUnit::new(NeuronId(0), "p0(0000)".to_owned(), BuiltinModel::Iaf);
        let err = unit.initialize_and_solve_initial(&BuiltinIntegrators::new(STEP)).unwrap_err();
        assert!(matches!(err, UnitError::IllegalTransition { from: UnitState::Built, .. }));
    }

    #[test]
    fn initialize_requires_bound_synapses() {
        let mut unit = NeuronUnit::new(NeuronId(1), "p1(0000)".to_owned(), BuiltinModel::Iaf);
        unit.setup(iaf_params(0.0)).unwrap();
        let syn = SynapseUnit::new("s(p0,p1)".to_owned(), ProjectionId(0), "A_B", NeuronId(1), BuiltinModel::CobaSynapse);
        unit.attach_synapse(syn).unwrap();
        assert!(unit.initialize_and_solve_initial(&BuiltinIntegrators::new(STEP)).is_err());
    }

    #[test]
    fn initialize_twice_is_illegal() {
        let mut unit = source_unit(0, vec![]);
        let factory = BuiltinIntegrators::new(STEP);
        unit.initialize_and_solve_initial(&factory).unwrap();
        assert!(unit.initialize_and_solve_initial(&factory).is_err());
    }

    #[test]
    fn deliver_to_unknown_port_fails() {
        let mut unit = iaf_unit_with_synapse(1e-9);
        unit.initialize_and_solve_initial(&BuiltinIntegrators::new(STEP)).unwrap();
        assert!(matches!(
            unit.deliver(InletPort { synapse: 2, port: 0 }),
            Err(UnitError::UnknownPort { .. })
        ));
        assert!(matches!(
            unit.deliver(InletPort { synapse: 0, port: 1 }),
            Err(UnitError::UnknownPort { .. })
        ));
    }

    #[test]
    fn attach_after_initialize_is_illegal() {
        let mut unit = source_unit(0, vec![]);
        unit.initialize_and_solve_initial(&BuiltinIntegrators::new(STEP)).unwrap();
        let syn = SynapseUnit::new("s".to_owned(), ProjectionId(0), "P", NeuronId(0), BuiltinModel::CobaSynapse);
        assert!(unit.attach_synapse(syn).is_err());
    }
}
