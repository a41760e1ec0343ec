//! Fluent builder for constructing a [`Scheduler`].

use tracing::{debug, info};

use pnn_core::RunConfig;
use pnn_network::Network;
use pnn_unit::{BuiltinIntegrators, EventQueue, IntegratorFactory};

use crate::{Scheduler, SimError, SimResult};

/// Fluent builder for [`Scheduler`].
///
/// # Required inputs
///
/// - [`RunConfig`]: reporting interval, horizon, drain bound, …
/// - [`Network`]: from [`pnn_network::Assembler`]
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                                          |
/// |-----------------|--------------------------------------------------|
/// | `.factory(f)`   | `BuiltinIntegrators::new(config.integrator_step)` |
///
/// # Example
///
/// ```rust,ignore
/// let network = Assembler::new(&model).seed(config.seed).assemble()?;
/// let mut scheduler = SchedulerBuilder::new(config, network).build()?;
/// let stats = scheduler.run(&mut NoopObserver)?;
/// ```
pub struct SchedulerBuilder<F: IntegratorFactory = BuiltinIntegrators> {
    config:  RunConfig,
    network: Network,
    factory: F,
}

impl SchedulerBuilder<BuiltinIntegrators> {
    pub fn new(config: RunConfig, network: Network) -> Self {
        let factory = BuiltinIntegrators::new(config.integrator_step);
        Self { config, network, factory }
    }
}

impl<F: IntegratorFactory> SchedulerBuilder<F> {
    /// Build integrators with `factory` instead of the built-in models.
    pub fn factory<G: IntegratorFactory>(self, factory: G) -> SchedulerBuilder<G> {
        SchedulerBuilder { config: self.config, network: self.network, factory }
    }

    /// Validate the configuration and the delay constraint, initialize every
    /// unit, and return a ready-to-run [`Scheduler`].
    ///
    /// Fails before any integration if the network's minimal delay is
    /// below the reporting interval.
    pub fn build(self) -> SimResult<Scheduler> {
        self.config.validate()?;

        let minimal_delay = self.network.minimal_delay();
        if minimal_delay < self.config.reporting_interval {
            return Err(SimError::DelayBelowInterval {
                minimal_delay,
                reporting_interval: self.config.reporting_interval,
            });
        }

        let mut network = self.network;
        initialize_units(&mut network, &self.factory)?;

        info!(
            neurons       = network.neuron_count(),
            equations     = network.equation_count(),
            minimal_delay,
            interval      = self.config.reporting_interval,
            horizon       = self.config.time_horizon,
            "units initialized"
        );

        Ok(Scheduler {
            boundaries:       self.config.boundaries(),
            config:           self.config,
            network,
            queue:            EventQueue::new(),
            time:             0.0,
            events_delivered: 0,
        })
    }
}

#[cfg(not(feature = "parallel"))]
fn initialize_units<F: IntegratorFactory>(network: &mut Network, factory: &F) -> SimResult<()> {
    for unit in network.neurons_mut() {
        unit.initialize_and_solve_initial(factory)?;
        debug!(unit = unit.name(), variables = unit.variable_count(), "unit initialized");
    }
    Ok(())
}

#[cfg(feature = "parallel")]
fn initialize_units<F: IntegratorFactory>(network: &mut Network, factory: &F) -> SimResult<()> {
    use rayon::prelude::*;

    network
        .neurons_mut()
        .par_iter_mut()
        .try_for_each(|unit| unit.initialize_and_solve_initial(factory))?;
    debug!(units = network.neuron_count(), "units initialized in parallel");
    Ok(())
}
