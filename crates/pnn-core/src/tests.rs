//! Unit tests for pnn-core primitives.

#[cfg(test)]
mod ids {
    use crate::{NeuronId, PopulationId, ProjectionId};

    #[test]
    fn index_roundtrip() {
        let id = NeuronId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NeuronId::from_index(42), Some(id));
        assert_eq!(NeuronId::from_index(u32::MAX as usize + 1), None);
    }

    #[test]
    fn invalid_is_max() {
        assert_eq!(NeuronId::INVALID.0, u32::MAX);
        assert_eq!(ProjectionId::INVALID.index(), u32::MAX as usize);
    }

    #[test]
    fn display() {
        assert_eq!(NeuronId(7).to_string(), "neuron #7");
        assert_eq!(PopulationId(2).to_string(), "p2");
    }
}

#[cfg(test)]
mod time {
    use crate::{ReportingBoundaries, RunConfig};

    fn config(interval: f64, horizon: f64) -> RunConfig {
        RunConfig {
            reporting_interval: interval,
            time_horizon:       horizon,
            ..RunConfig::default()
        }
    }

    #[test]
    fn boundaries_end_exactly_at_horizon() {
        let b: Vec<f64> = config(0.01, 0.1).boundaries().collect();
        assert_eq!(b.len(), 10);
        assert_eq!(b[0], 0.01);
        assert_eq!(*b.last().unwrap(), 0.1);
        assert!(b.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn boundaries_non_multiple_horizon() {
        let b: Vec<f64> = ReportingBoundaries::new(0.01, 0.025).collect();
        assert_eq!(b.len(), 3);
        assert_eq!(b[2], 0.025);
    }

    #[test]
    fn zero_horizon_has_no_boundaries() {
        assert_eq!(ReportingBoundaries::new(0.01, 0.0).total(), 0);
        assert_eq!(ReportingBoundaries::new(0.01, 0.0).next(), None);
    }

    #[test]
    fn exact_size() {
        let mut b = ReportingBoundaries::new(0.5, 2.0);
        assert_eq!(b.len(), 4);
        b.next();
        assert_eq!(b.len(), 3);
    }

    #[test]
    fn validate_rejects_non_positive_interval() {
        assert!(config(0.0, 1.0).validate().is_err());
        assert!(config(-1.0, 1.0).validate().is_err());
        assert!(config(f64::NAN, 1.0).validate().is_err());
        assert!(config(0.1, 1.0).validate().is_ok());
    }

    #[test]
    fn progress_fraction() {
        let cfg = config(0.25, 1.0);
        assert_eq!(cfg.progress(0.5), 0.5);
        assert_eq!(cfg.progress(1.0), 1.0);
        assert_eq!(config(0.01, 0.0).progress(0.0), 1.0);
    }
}

#[cfg(test)]
mod units {
    use crate::{Dimension, Quantity, Unit};

    #[test]
    fn parse_symbols() {
        assert_eq!("mV".parse::<Unit>().unwrap(), Unit::Millivolt);
        assert_eq!("nS".parse::<Unit>().unwrap(), Unit::Nanosiemens);
        assert_eq!("dimensionless".parse::<Unit>().unwrap(), Unit::Dimensionless);
        assert!("furlong".parse::<Unit>().is_err());
    }

    #[test]
    fn si_conversion() {
        assert_eq!(Quantity::new(5.0, Unit::Millisecond).to_si(), 5.0 * 1e-3);
        assert_eq!(Quantity::new(0.2, Unit::Nanofarad).to_si(), 0.2 * 1e-9);
        assert_eq!(Quantity::new(-0.06, Unit::Volt).to_si(), -0.06);
    }

    #[test]
    fn dimensions() {
        assert_eq!(Unit::Picofarad.dimension(), Dimension::Capacitance);
        assert_eq!(Unit::Hertz.dimension(), Dimension::Frequency);
        assert_eq!(Unit::Microsiemens.dimension(), Dimension::Conductance);
    }

    #[test]
    fn display_uses_symbol() {
        assert_eq!(Quantity::new(1.5, Unit::Millivolt).to_string(), "1.5 mV");
    }
}

#[cfg(test)]
mod rng {
    use rand::Rng;

    use crate::{SimRng, StreamRng};

    #[test]
    fn streams_deterministic() {
        let mut a = StreamRng::new(7, 0);
        let mut b = StreamRng::new(7, 0);
        for _ in 0..100 {
            let x: f64 = a.inner().r#gen();
            let y: f64 = b.inner().r#gen();
            assert_eq!(x, y);
        }
    }

    #[test]
    fn different_streams_differ() {
        let mut a = StreamRng::new(7, 0);
        let mut b = StreamRng::new(7, 1);
        let x: u64 = a.inner().r#gen();
        let y: u64 = b.inner().r#gen();
        assert_ne!(x, y);
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = SimRng::new(0);
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
    }

    #[test]
    fn child_is_deterministic() {
        let mut r1 = SimRng::new(3);
        let mut r2 = SimRng::new(3);
        assert_eq!(r1.child(5).unit(), r2.child(5).unit());
        assert_ne!(r1.child(5).unit(), r1.child(6).unit());
    }
}
