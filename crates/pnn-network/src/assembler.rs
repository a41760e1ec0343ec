//! Network assembler: model description → [`Network`].
//!
//! # Algorithm
//!
//! 1. Resolve every component's definition through the
//!    [`ComponentLoader`] and bind its parameters.  Random-distribution
//!    components are registered with their own RNG streams.
//! 2. Create populations, group by group, in declaration order.  Each
//!    population gets the next [`PopulationId`] and instantiates its
//!    neurons as `p{population_id}({index:04})`.  Poisson spike sources
//!    draw their whole spike train here from the shared run RNG.
//! 3. Wire projections, after all populations exist.  Each projection
//!    places one synapse unit on every target neuron, consumes its
//!    connection generator once, and appends one destination per
//!    connection to the source neuron.  Synapse parameters are bound once
//!    all of a projection's connections are known.
//!
//! The same model and seed always produce the same network.

use std::path::PathBuf;

use rustc_hash::FxHashMap;
use tracing::{debug, info};

use pnn_connect::{
    ConnectionRule, ConnectionScale, DelayTracked, Mask, load_connections_file,
};
use pnn_core::{GroupId, NeuronId, PopulationId, ProjectionId, SimRng};
use pnn_model::{
    BuiltinModel, ComponentDecl, ComponentDefinition, ComponentKind, ComponentLoader,
    DefaultLoader, ModelDescription, ModelError, ModelResult, ParameterSet, ProjectionDecl,
};
use pnn_unit::{Destination, NeuronUnit, SynapseUnit, poisson_spike_times};

use crate::{
    Group, Network, NetworkError, NetworkResult, Population, Projection, RandomDistributions,
    SynapseRef,
};

// ── Assembler ─────────────────────────────────────────────────────────────────

/// Fluent builder for a [`Network`].
///
/// ```rust,ignore
/// let network = Assembler::new(&model)
///     .in_dir(experiment_dir)
///     .seed(42)
///     .assemble()?;
/// ```
pub struct Assembler<'m, L = DefaultLoader> {
    model:    &'m ModelDescription,
    loader:   L,
    seed:     u64,
    base_dir: PathBuf,
    scale:    ConnectionScale,
}

impl<'m> Assembler<'m, DefaultLoader> {
    pub fn new(model: &'m ModelDescription) -> Self {
        Self {
            model,
            loader:   DefaultLoader::default(),
            seed:     0,
            base_dir: PathBuf::from("."),
            scale:    ConnectionScale::default(),
        }
    }

    /// Resolve component files and connection files relative to `dir`.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.loader = DefaultLoader::new(dir.clone());
        self.base_dir = dir;
        self
    }
}

impl<'m, L: ComponentLoader> Assembler<'m, L> {
    /// Replace the component loader.
    pub fn with_loader<L2: ComponentLoader>(self, loader: L2) -> Assembler<'m, L2> {
        Assembler {
            model:    self.model,
            loader,
            seed:     self.seed,
            base_dir: self.base_dir,
            scale:    self.scale,
        }
    }

    /// Run seed for Poisson sources, probabilistic connection rules and
    /// random distributions.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Default scale factors for connection files that do not set their own.
    pub fn connection_scale(mut self, scale: ConnectionScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn assemble(self) -> NetworkResult<Network> {
        self.model.validate()?;

        let mut build = Build {
            components:    FxHashMap::default(),
            distributions: RandomDistributions::new(),
            rng:           SimRng::new(self.seed),
            network:       Network::empty(&self.model.name),
        };

        build.resolve_components(self.model, &self.loader, self.seed)?;

        for (g, decl) in self.model.groups.iter().enumerate() {
            let group = GroupId(g as u32);
            build.network.groups.push(Group {
                id:            group,
                name:          decl.name.clone(),
                populations:   Vec::new(),
                projections:   Vec::new(),
                minimal_delay: f64::INFINITY,
            });
            for population in &decl.populations {
                build.add_population(group, &population.name, &population.prototype, population.number)?;
            }
        }

        for (g, decl) in self.model.groups.iter().enumerate() {
            for projection in &decl.projections {
                build.add_projection(self.model, GroupId(g as u32), projection, &self)?;
            }
        }

        let network = build.network;
        info!(
            network       = %network.name(),
            neurons       = network.neuron_count(),
            synapses      = network.synapse_count(),
            connections   = network.connection_count(),
            minimal_delay = network.minimal_delay(),
            "network assembled"
        );
        Ok(network)
    }

    fn rule(&self, decl: &ComponentDecl, component: &Resolved, sample: Sampler<'_>, reflexive: bool)
        -> NetworkResult<ConnectionRule>
    {
        let rule = match component.definition.model {
            BuiltinModel::ExplicitConnections => {
                if let Some(rows) = &decl.connections {
                    ConnectionRule::Explicit(rows.clone())
                } else if let Some(path) = &decl.connection_file {
                    let scale = decl
                        .connection_scale
                        .map(|[weight, delay]| ConnectionScale { weight, delay })
                        .unwrap_or(self.scale);
                    let rows = load_connections_file(&self.base_dir.join(path), scale).map_err(|e| {
                        NetworkError::Connection { projection: decl.name.clone(), source: e }
                    })?;
                    debug!(component = %decl.name, file = %path.display(), rows = rows.len(), "connections loaded");
                    ConnectionRule::Explicit(rows)
                } else {
                    return Err(NetworkError::MissingConnections { component: decl.name.clone() });
                }
            }
            BuiltinModel::AllToAll => {
                let p = component.parameters.resolve(sample)?;
                ConnectionRule::AllToAll {
                    weight:   p.scalar("weight")?,
                    delay:    p.scalar("delay")?,
                    autapses: p.flag("autapses")? || !reflexive,
                }
            }
            BuiltinModel::OneToOne => {
                let p = component.parameters.resolve(sample)?;
                ConnectionRule::OneToOne { weight: p.scalar("weight")?, delay: p.scalar("delay")? }
            }
            BuiltinModel::FixedProbability => {
                let p = component.parameters.resolve(sample)?;
                ConnectionRule::FixedProbability {
                    p:        p.scalar("p")?,
                    weight:   p.scalar("weight")?,
                    delay:    p.scalar("delay")?,
                    autapses: p.flag("autapses")? || !reflexive,
                }
            }
            _ => {
                return Err(NetworkError::WrongKind {
                    component: decl.name.clone(),
                    expected:  "connection rule",
                    found:     component.definition.kind(),
                });
            }
        };
        Ok(rule)
    }
}

// ── Build state ───────────────────────────────────────────────────────────────

struct Resolved {
    definition: ComponentDefinition,
    parameters: ParameterSet,
}

type Sampler<'a> = &'a mut dyn FnMut(&str) -> ModelResult<f64>;

struct Build<'m> {
    components:    FxHashMap<&'m str, Resolved>,
    distributions: RandomDistributions,
    rng:           SimRng,
    network:       Network,
}

impl<'m> Build<'m> {
    fn resolve_components<L: ComponentLoader>(
        &mut self,
        model:  &'m ModelDescription,
        loader: &L,
        seed:   u64,
    ) -> NetworkResult<()> {
        let mut stream = 0u64;
        for decl in &model.components {
            let definition = loader.resolve(&decl.definition)?;
            let parameters = ParameterSet::bind(decl, &definition)?;

            if definition.kind() == ComponentKind::RandomDistribution {
                if let Some((parameter, _)) = parameters.random_references().next() {
                    return Err(ModelError::InvalidParameter {
                        component: decl.name.clone(),
                        parameter: parameter.to_owned(),
                        reason:    "random distribution parameters must be fixed".to_owned(),
                    }
                    .into());
                }
                let fixed = parameters.resolve(|_| Ok(0.0))?;
                self.distributions.register(&decl.name, definition.model, &fixed, seed, stream)?;
                stream += 1;
            }

            debug!(component = %decl.name, definition = %decl.definition, model = %definition.model, "component resolved");
            self.components.insert(decl.name.as_str(), Resolved { definition, parameters });
        }

        for decl in &model.components {
            let Some(resolved) = self.components.get(decl.name.as_str()) else { continue };
            for (parameter, distribution) in resolved.parameters.random_references() {
                if !self.distributions.contains(distribution) {
                    return Err(ModelError::UnknownDistribution {
                        component:    decl.name.clone(),
                        parameter:    parameter.to_owned(),
                        distribution: distribution.to_owned(),
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    fn component(&self, name: &str, referenced_by: &str) -> NetworkResult<&Resolved> {
        self.components.get(name).ok_or_else(|| {
            ModelError::UnknownComponent {
                name:          name.to_owned(),
                referenced_by: referenced_by.to_owned(),
            }
            .into()
        })
    }

    fn add_population(
        &mut self,
        group:     GroupId,
        name:      &str,
        prototype: &str,
        number:    usize,
    ) -> NetworkResult<()> {
        let id = PopulationId(self.network.populations.len() as u32);
        let start = self.network.neurons.len();

        let Build { components, distributions, rng, network } = self;
        let component = components.get(prototype).ok_or_else(|| ModelError::UnknownComponent {
            name:          prototype.to_owned(),
            referenced_by: name.to_owned(),
        })?;
        let model = component.definition.model;
        if !matches!(model.kind(), ComponentKind::Neuron | ComponentKind::SpikeSource) {
            return Err(NetworkError::WrongKind {
                component: prototype.to_owned(),
                expected:  "neuron or spike source",
                found:     model.kind(),
            });
        }

        let mut sample = sampler(distributions);
        for index in 0..number {
            let neuron = NeuronId(network.neurons.len() as u32);
            let mut parameters = component.parameters.resolve(&mut sample)?;
            if model == BuiltinModel::SpikeSourcePoisson {
                let times = poisson_spike_times(
                    parameters.scalar("rate")?,
                    parameters.scalar("duration")?,
                    parameters.scalar("t0")?,
                    rng.inner(),
                );
                parameters = parameters.with_array("spike_times", times);
            }
            let mut unit = NeuronUnit::new(neuron, format!("p{}({:04})", id.0, index), model);
            unit.setup(parameters)?;
            network.neurons.push(unit);
        }

        network.populations.push(Population {
            id,
            name:      name.to_owned(),
            group,
            component: prototype.to_owned(),
            model,
            neurons:   start..network.neurons.len(),
        });
        if let Some(g) = network.groups.get_mut(group.index()) {
            g.populations.push(id);
        }
        debug!(population = name, id = id.0, size = number, model = %model, "population created");
        Ok(())
    }

    fn add_projection<L: ComponentLoader>(
        &mut self,
        model:     &ModelDescription,
        group:     GroupId,
        decl:      &ProjectionDecl,
        assembler: &Assembler<'_, L>,
    ) -> NetworkResult<()> {
        let id = ProjectionId(self.network.projections.len() as u32);
        let source = endpoint(&self.network, model, decl, &decl.source)?;
        let target = endpoint(&self.network, model, decl, &decl.target)?;

        if target.model.kind() == ComponentKind::SpikeSource {
            return Err(NetworkError::SourceAsTarget {
                projection: decl.name.clone(),
                population: target.name.clone(),
            });
        }

        let synapse = self.component(&decl.synapse, &decl.name)?;
        if synapse.definition.kind() != ComponentKind::Synapse {
            return Err(NetworkError::WrongKind {
                component: decl.synapse.clone(),
                expected:  "synapse",
                found:     synapse.definition.kind(),
            });
        }
        let synapse_model = synapse.definition.model;

        let connection_decl = model.component(&decl.connection).ok_or_else(|| {
            ModelError::UnknownComponent {
                name:          decl.connection.clone(),
                referenced_by: decl.name.clone(),
            }
        })?;

        let Build { components, distributions, rng, network } = self;
        let mut sample = sampler(distributions);

        let connection = components.get(decl.connection.as_str()).ok_or_else(|| {
            ModelError::UnknownComponent {
                name:          decl.connection.clone(),
                referenced_by: decl.name.clone(),
            }
        })?;
        let rule = assembler.rule(connection_decl, connection, &mut sample, source.id == target.id)?;
        let in_context = |e| NetworkError::Connection { projection: decl.name.clone(), source: e };
        let mut generator = DelayTracked::new(
            rule.generator(Mask::full(source.len(), target.len()), rng.child(u64::from(id.0)))
                .map_err(in_context)?,
        );

        // ── One synapse per target neuron ─────────────────────────────────
        let mut synapses = Vec::with_capacity(target.len());
        for owner in target.ids() {
            let unit = SynapseUnit::new(
                format!("s(p{},p{})", source.id.0, target.id.0),
                id,
                &decl.name,
                owner,
                synapse_model,
            );
            let slot = network.neurons[owner.index()].attach_synapse(unit)?;
            synapses.push(SynapseRef { neuron: owner, slot });
        }

        // ── Consume connections ───────────────────────────────────────────
        let mut connections = 0usize;
        for conn in generator.by_ref() {
            let conn = conn.map_err(in_context)?;
            let out_of_range = |what, index, size| NetworkError::IndexOutOfRange {
                projection: decl.name.clone(),
                what,
                index,
                size,
            };
            let from = source.neuron(conn.source).ok_or_else(|| out_of_range("source", conn.source, source.len()))?;
            let to = *synapses
                .get(conn.target)
                .ok_or_else(|| out_of_range("target", conn.target, target.len()))?;

            let port = network.neurons[to.neuron.index()].add_inlet(to.slot, conn.weight)?;
            network.neurons[from.index()].add_destination(Destination {
                port,
                delay:  conn.delay,
                target: to.neuron,
            });
            connections += 1;
        }
        let minimal_delay = generator.minimal_delay();

        // ── Bind synapse parameters ───────────────────────────────────────
        let synapse = components.get(decl.synapse.as_str()).ok_or_else(|| {
            ModelError::UnknownComponent {
                name:          decl.synapse.clone(),
                referenced_by: decl.name.clone(),
            }
        })?;
        for s in &synapses {
            let parameters = synapse.parameters.resolve(&mut sample)?;
            network.neurons[s.neuron.index()].setup_synapse(s.slot, parameters)?;
        }

        info!(
            projection    = %decl.name,
            rule          = rule.kind(),
            connections,
            minimal_delay = ?minimal_delay,
            "projection wired"
        );

        if let Some(g) = network.groups.get_mut(group.index()) {
            g.projections.push(id);
            if let Some(d) = minimal_delay {
                g.minimal_delay = g.minimal_delay.min(d);
            }
        }
        network.projections.push(Projection {
            id,
            name:          decl.name.clone(),
            group,
            source:        source.id,
            target:        target.id,
            rule:          rule.kind(),
            synapse:       decl.synapse.clone(),
            synapses,
            connections,
            minimal_delay,
        });
        Ok(())
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn sampler(distributions: &mut RandomDistributions) -> impl FnMut(&str) -> ModelResult<f64> + '_ {
    move |name: &str| {
        distributions.sample(name).ok_or_else(|| ModelError::Resolution {
            reference: name.to_owned(),
            reason:    "not a random distribution component".to_owned(),
        })
    }
}

/// Look up a projection endpoint, which must be a flat population.
fn endpoint(
    network: &Network,
    model:   &ModelDescription,
    decl:    &ProjectionDecl,
    name:    &str,
) -> NetworkResult<Population> {
    if let Some(p) = network.population_by_name(name) {
        return Ok(p.clone());
    }
    if model.group(name).is_some() {
        return Err(NetworkError::NonFlatEndpoint {
            projection: decl.name.clone(),
            endpoint:   name.to_owned(),
        });
    }
    Err(NetworkError::UnknownPopulation { projection: decl.name.clone(), name: name.to_owned() })
}
