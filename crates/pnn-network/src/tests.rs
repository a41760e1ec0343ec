//! Unit tests for pnn-network.

use pnn_connect::ConnectionScale;
use pnn_core::{NeuronId, PopulationId, Unit};
use pnn_model::{
    ComponentDecl, GroupDecl, ModelDescription, ModelError, ParameterValue, PopulationDecl,
    ProjectionDecl, VariablePath,
};
use pnn_unit::BuiltinIntegrators;

use crate::{Assembler, Network, NetworkError};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn iaf() -> ComponentDecl {
    ComponentDecl::new("exc", "iaf")
        .with("C_m", 0.2, Unit::Nanofarad)
        .with("g_L", 10.0, Unit::Nanosiemens)
        .with("E_L", -70.0, Unit::Millivolt)
        .with("V_th", -50.0, Unit::Millivolt)
        .with("V_reset", -60.0, Unit::Millivolt)
}

fn syn() -> ComponentDecl {
    ComponentDecl::new("syn", "coba_synapse")
        .with("tau_syn", 5.0, Unit::Millisecond)
        .with("E_rev", 0.0, Unit::Millivolt)
}

fn source(times_ms: &[f64]) -> ComponentDecl {
    ComponentDecl::new("src", "spike_source_array").with_value(
        "spike_times",
        ParameterValue::Array { values: times_ms.to_vec(), unit: Unit::Millisecond },
    )
}

fn all_to_all(weight_ns: f64, delay_ms: f64) -> ComponentDecl {
    ComponentDecl::new("wiring", "all_to_all")
        .with("weight", weight_ns, Unit::Nanosiemens)
        .with("delay", delay_ms, Unit::Millisecond)
}

fn population(name: &str, number: usize, prototype: &str) -> PopulationDecl {
    PopulationDecl { name: name.to_owned(), number, prototype: prototype.to_owned() }
}

fn projection(name: &str, source: &str, target: &str, connection: &str) -> ProjectionDecl {
    ProjectionDecl {
        name:       name.to_owned(),
        source:     source.to_owned(),
        target:     target.to_owned(),
        connection: connection.to_owned(),
        synapse:    "syn".to_owned(),
    }
}

/// `A` (spike sources) → `B` (iaf) through `connection`.
fn pair_model(a: usize, b: usize, connection: ComponentDecl) -> ModelDescription {
    ModelDescription {
        name:       "pair".to_owned(),
        components: vec![source(&[30.0]), iaf(), syn(), connection],
        groups:     vec![GroupDecl {
            name:        "Net".to_owned(),
            populations: vec![population("A", a, "src"), population("B", b, "exc")],
            projections: vec![projection("A_B", "A", "B", "wiring")],
        }],
    }
}

fn initialize(network: &mut Network) {
    let factory = BuiltinIntegrators::new(1e-5);
    for n in network.neurons_mut() {
        n.initialize_and_solve_initial(&factory).unwrap();
    }
}

// ── Populations ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod populations {
    use super::*;

    #[test]
    fn neurons_are_contiguous_and_named() {
        let model = pair_model(2, 3, all_to_all(1.0, 2.0));
        let network = Assembler::new(&model).assemble().unwrap();

        assert_eq!(network.neuron_count(), 5);
        let b = network.population_by_name("B").unwrap();
        assert_eq!(b.id, PopulationId(1));
        assert_eq!(b.neurons, 2..5);
        assert_eq!(b.neuron(0), Some(NeuronId(2)));
        assert_eq!(b.neuron(3), None);

        let names: Vec<&str> = network.neurons().iter().map(|n| n.name()).collect();
        assert_eq!(names, ["p0(0000)", "p0(0001)", "p1(0000)", "p1(0001)", "p1(0002)"]);
    }

    #[test]
    fn population_ids_are_global_across_groups() {
        let mut model = pair_model(1, 1, all_to_all(1.0, 2.0));
        model.groups.push(GroupDecl {
            name:        "Extra".to_owned(),
            populations: vec![population("C", 2, "exc")],
            projections: Vec::new(),
        });
        let network = Assembler::new(&model).assemble().unwrap();

        let c = network.population_by_name("C").unwrap();
        assert_eq!(c.id, PopulationId(2));
        assert_eq!(network.neurons()[c.neurons.start].name(), "p2(0000)");
        assert_eq!(network.groups()[1].populations, vec![PopulationId(2)]);
    }

    #[test]
    fn poisson_trains_depend_only_on_seed() {
        let poisson = ComponentDecl::new("src", "SpikeSourcePoisson")
            .with("rate", 200.0, Unit::Hertz)
            .with("duration", 100.0, Unit::Millisecond);
        let model = ModelDescription {
            name:       "noise".to_owned(),
            components: vec![poisson],
            groups:     vec![GroupDecl {
                name:        "Net".to_owned(),
                populations: vec![population("P", 4, "src")],
                projections: Vec::new(),
            }],
        };
        let trains = |seed: u64| -> Vec<Vec<f64>> {
            let mut network = Assembler::new(&model).seed(seed).assemble().unwrap();
            initialize(&mut network);
            network.neurons_mut().iter_mut().map(|n| n.advance(1.0).unwrap()).collect()
        };

        let first = trains(7);
        assert_eq!(first, trains(7));
        assert_ne!(first, trains(8));
        assert!(first.iter().all(|t| t.iter().all(|&s| s > 0.0 && s <= 0.1 + 1e-12)));
        assert!(first.iter().any(|t| !t.is_empty()));
    }

    #[test]
    fn random_parameters_are_sampled_per_neuron() {
        let model = |seed| {
            let mut m = pair_model(1, 6, all_to_all(1.0, 2.0));
            m.components.push(
                ComponentDecl::new("rest", "uniform")
                    .with("low", -75.0, Unit::Dimensionless)
                    .with("high", -65.0, Unit::Dimensionless),
            );
            m.components[1] = iaf().with_value(
                "E_L",
                ParameterValue::Random { random: "rest".to_owned(), unit: Unit::Millivolt },
            );
            let mut network = Assembler::new(&m).seed(seed).assemble().unwrap();
            initialize(&mut network);
            network.neurons()[1..].iter().map(|n| n.value("V").unwrap()).collect::<Vec<f64>>()
        };

        let rest = model(3);
        assert!(rest.iter().all(|&v| (-0.075..-0.065).contains(&v)));
        assert!(rest.windows(2).any(|w| w[0] != w[1]));
        assert_eq!(rest, model(3));
    }

    fn rest_potentials(low: f64, high: f64) -> Result<Vec<f64>, NetworkError> {
        let mut m = pair_model(1, 4, all_to_all(1.0, 2.0));
        m.components.push(
            ComponentDecl::new("rest", "uniform")
                .with("low", low, Unit::Dimensionless)
                .with("high", high, Unit::Dimensionless),
        );
        m.components[1] = iaf().with_value(
            "E_L",
            ParameterValue::Random { random: "rest".to_owned(), unit: Unit::Millivolt },
        );
        let mut network = Assembler::new(&m).seed(5).assemble()?;
        initialize(&mut network);
        Ok(network.neurons()[1..].iter().map(|n| n.value("V").unwrap()).collect())
    }

    #[test]
    fn degenerate_uniform_is_constant() {
        assert_eq!(rest_potentials(-70.0, -70.0).unwrap(), vec![-0.07; 4]);
    }

    #[test]
    fn inverted_uniform_range_is_rejected() {
        let err = rest_potentials(-65.0, -75.0).unwrap_err();
        assert!(matches!(err, NetworkError::Model(ModelError::InvalidParameter { .. })));
    }

    #[test]
    fn unknown_distribution_is_rejected() {
        let mut model = pair_model(1, 1, all_to_all(1.0, 2.0));
        model.components[1] = iaf().with_value(
            "E_L",
            ParameterValue::Random { random: "missing".to_owned(), unit: Unit::Millivolt },
        );
        let err = Assembler::new(&model).assemble().unwrap_err();
        assert!(matches!(err, NetworkError::Model(ModelError::UnknownDistribution { .. })));
    }

    #[test]
    fn synapse_as_prototype_is_wrong_kind() {
        let mut model = pair_model(1, 1, all_to_all(1.0, 2.0));
        model.groups[0].populations[1].prototype = "syn".to_owned();
        let err = Assembler::new(&model).assemble().unwrap_err();
        assert!(matches!(err, NetworkError::WrongKind { .. }));
    }
}

// ── Projections ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod projections {
    use super::*;

    #[test]
    fn one_synapse_per_target_neuron() {
        let model = pair_model(2, 3, all_to_all(1.0, 2.0));
        let network = Assembler::new(&model).assemble().unwrap();

        let p = &network.projections()[0];
        assert_eq!(p.synapses.len(), 3);
        assert_eq!(p.connections, 6);
        assert_eq!(p.rule, "all_to_all");
        assert_eq!(network.synapse_count(), 3);

        for (i, s) in p.synapses.iter().enumerate() {
            assert_eq!(s.neuron, NeuronId(2 + i as u32));
            let unit = &network.neuron(s.neuron).unwrap().synapses()[s.slot];
            assert_eq!(unit.name(), "s(p0,p1)");
            assert_eq!(unit.owner(), s.neuron);
            assert_eq!(unit.connection_count(), 2);
            assert_eq!(unit.weights(), &[1e-9, 1e-9]);
        }
        for a in &network.neurons()[..2] {
            assert_eq!(a.destinations().len(), 3);
        }
    }

    #[test]
    fn minimal_delay_per_group_and_network() {
        let connection = ComponentDecl::new("wiring", "explicit_connections")
            .with_connections(vec![vec![0.0, 0.0, 1e-9, 0.004], vec![0.0, 1.0, 1e-9, 0.0025]]);
        let network = Assembler::new(&pair_model(1, 2, connection)).assemble().unwrap();

        assert_eq!(network.projections()[0].minimal_delay, Some(0.0025));
        assert_eq!(network.groups()[0].minimal_delay, 0.0025);
        assert_eq!(network.minimal_delay(), 0.0025);
    }

    #[test]
    fn no_connections_means_infinite_minimal_delay() {
        let mut model = pair_model(1, 1, all_to_all(1.0, 2.0));
        model.groups[0].projections.clear();
        let network = Assembler::new(&model).assemble().unwrap();
        assert_eq!(network.minimal_delay(), f64::INFINITY);
        assert_eq!(network.connection_count(), 0);

        let empty = Assembler::new(&ModelDescription::default()).assemble().unwrap();
        assert_eq!(empty.neuron_count(), 0);
        assert_eq!(empty.minimal_delay(), f64::INFINITY);
    }

    #[test]
    fn explicit_index_out_of_range() {
        let connection = ComponentDecl::new("wiring", "explicit_connections")
            .with_connections(vec![vec![0.0, 5.0, 1e-9, 0.001]]);
        let err = Assembler::new(&pair_model(1, 2, connection)).assemble().unwrap_err();
        assert!(matches!(
            err,
            NetworkError::IndexOutOfRange { what: "target", index: 5, size: 2, .. }
        ));
    }

    #[test]
    fn negative_delay_carries_projection_context() {
        let connection = ComponentDecl::new("wiring", "explicit_connections")
            .with_connections(vec![vec![0.0, 0.0, 1e-9, -0.001]]);
        let err = Assembler::new(&pair_model(1, 1, connection)).assemble().unwrap_err();
        match err {
            NetworkError::Connection { projection, .. } => assert_eq!(projection, "A_B"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn explicit_rule_without_rows() {
        let connection = ComponentDecl::new("wiring", "explicit_connections");
        let err = Assembler::new(&pair_model(1, 1, connection)).assemble().unwrap_err();
        assert!(matches!(err, NetworkError::MissingConnections { .. }));
    }

    #[test]
    fn connection_file_relative_to_model_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a_b.conn"), "# src\ttgt\tw\td\n0\t1\t2.5\t1.5\n").unwrap();

        let mut connection = ComponentDecl::new("wiring", "explicit_connections");
        connection.connection_file = Some("a_b.conn".into());
        let model = pair_model(1, 2, connection);

        let network = Assembler::new(&model).in_dir(dir.path()).assemble().unwrap();
        let target = &network.neurons()[2];
        assert!((target.synapses()[0].weights()[0] - 2.5e-6).abs() < 1e-18);
        let d = network.minimal_delay();
        assert!((d - 1.5e-3).abs() < 1e-15);
        assert!(network.neurons()[1].synapses()[0].weights().is_empty());

        let network = Assembler::new(&model)
            .in_dir(dir.path())
            .connection_scale(ConnectionScale::IDENTITY)
            .assemble()
            .unwrap();
        assert_eq!(network.minimal_delay(), 1.5);
    }

    #[test]
    fn group_endpoint_is_not_flat() {
        let mut model = pair_model(1, 1, all_to_all(1.0, 2.0));
        model.groups[0].projections[0].source = "Net".to_owned();
        let err = Assembler::new(&model).assemble().unwrap_err();
        assert!(matches!(err, NetworkError::NonFlatEndpoint { .. }));
    }

    #[test]
    fn unknown_endpoint() {
        let mut model = pair_model(1, 1, all_to_all(1.0, 2.0));
        model.groups[0].projections[0].target = "Z".to_owned();
        let err = Assembler::new(&model).assemble().unwrap_err();
        assert!(matches!(err, NetworkError::UnknownPopulation { .. }));
    }

    #[test]
    fn spike_source_cannot_be_a_target() {
        let mut model = pair_model(1, 1, all_to_all(1.0, 2.0));
        model.groups[0].projections[0].target = "A".to_owned();
        let err = Assembler::new(&model).assemble().unwrap_err();
        assert!(matches!(err, NetworkError::SourceAsTarget { .. }));
    }

    #[test]
    fn recurrent_all_to_all_skips_autapses_when_asked() {
        let mut model = pair_model(1, 3, all_to_all(1.0, 2.0).with("autapses", 0.0, Unit::Dimensionless));
        model.groups[0].projections[0].source = "B".to_owned();
        let network = Assembler::new(&model).assemble().unwrap();
        assert_eq!(network.projections()[0].connections, 6);
    }

    #[test]
    fn fixed_probability_is_reproducible() {
        let connection = ComponentDecl::new("wiring", "fixed_probability")
            .with("p", 0.5, Unit::Dimensionless)
            .with("weight", 1.0, Unit::Nanosiemens)
            .with("delay", 1.0, Unit::Millisecond);
        let model = pair_model(10, 10, connection);
        let count = |seed| Assembler::new(&model).seed(seed).assemble().unwrap().connection_count();
        assert_eq!(count(11), count(11));
        assert!(count(11) > 0 && count(11) < 100);
    }
}

// ── Report variables ──────────────────────────────────────────────────────────

#[cfg(test)]
mod variables {
    use super::*;

    #[test]
    fn resolve_membrane_and_synapse_variables() {
        let model = pair_model(1, 2, all_to_all(1.0, 2.0));
        let mut network = Assembler::new(&model).assemble().unwrap();
        initialize(&mut network);

        let v: VariablePath = "Net.B[1].V".parse().unwrap();
        assert_eq!(network.resolve_variable(&v).unwrap(), NeuronId(2));
        let g: VariablePath = "Net.B[0].A_B.g".parse().unwrap();
        assert_eq!(network.resolve_variable(&g).unwrap(), NeuronId(1));
        assert_eq!(network.equation_count(), 2 * 4);
    }

    #[test]
    fn unknown_variables_are_reported() {
        let model = pair_model(1, 2, all_to_all(1.0, 2.0));
        let mut network = Assembler::new(&model).assemble().unwrap();
        initialize(&mut network);

        for path in ["Other.B[0].V", "Net.C[0].V", "Net.B[2].V", "Net.B[0].W"] {
            let p: VariablePath = path.parse().unwrap();
            assert!(
                matches!(network.resolve_variable(&p), Err(NetworkError::UnknownVariable { .. })),
                "{path}"
            );
        }
    }
}
