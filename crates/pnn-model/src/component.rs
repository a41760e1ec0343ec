//! Component definitions and the built-in model set.
//!
//! A [`ComponentDefinition`] is the typed result of resolving a component
//! reference: which built-in implementation backs it and the schema of
//! dimensioned parameters it accepts.  Definitions loaded from JSON files
//! may rename or add defaults to a built-in model's parameters but must
//! still provide every parameter the implementation reads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use pnn_core::Dimension;

use crate::{ModelError, ModelResult};

// ── ComponentKind ─────────────────────────────────────────────────────────────

/// Role a component plays in a network.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ComponentKind {
    Neuron,
    Synapse,
    SpikeSource,
    Connection,
    RandomDistribution,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComponentKind::Neuron             => "neuron",
            ComponentKind::Synapse            => "synapse",
            ComponentKind::SpikeSource        => "spike source",
            ComponentKind::Connection         => "connection rule",
            ComponentKind::RandomDistribution => "random distribution",
        };
        f.write_str(s)
    }
}

// ── BuiltinModel ──────────────────────────────────────────────────────────────

/// Implementation backing a component.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum BuiltinModel {
    /// Leaky integrate-and-fire neuron.
    #[serde(rename = "iaf")]
    Iaf,
    /// Conductance-based synapse with exponential decay.
    #[serde(rename = "coba_synapse")]
    CobaSynapse,
    #[serde(rename = "SpikeSourcePoisson")]
    SpikeSourcePoisson,
    #[serde(rename = "spike_source_array")]
    SpikeSourceArray,
    #[serde(rename = "explicit_connections")]
    ExplicitConnections,
    #[serde(rename = "all_to_all")]
    AllToAll,
    #[serde(rename = "one_to_one")]
    OneToOne,
    #[serde(rename = "fixed_probability")]
    FixedProbability,
    #[serde(rename = "uniform")]
    Uniform,
    #[serde(rename = "normal")]
    Normal,
}

impl BuiltinModel {
    pub const ALL: [BuiltinModel; 10] = [
        BuiltinModel::Iaf,
        BuiltinModel::CobaSynapse,
        BuiltinModel::SpikeSourcePoisson,
        BuiltinModel::SpikeSourceArray,
        BuiltinModel::ExplicitConnections,
        BuiltinModel::AllToAll,
        BuiltinModel::OneToOne,
        BuiltinModel::FixedProbability,
        BuiltinModel::Uniform,
        BuiltinModel::Normal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuiltinModel::Iaf                 => "iaf",
            BuiltinModel::CobaSynapse         => "coba_synapse",
            BuiltinModel::SpikeSourcePoisson  => "SpikeSourcePoisson",
            BuiltinModel::SpikeSourceArray    => "spike_source_array",
            BuiltinModel::ExplicitConnections => "explicit_connections",
            BuiltinModel::AllToAll            => "all_to_all",
            BuiltinModel::OneToOne            => "one_to_one",
            BuiltinModel::FixedProbability    => "fixed_probability",
            BuiltinModel::Uniform             => "uniform",
            BuiltinModel::Normal              => "normal",
        }
    }

    pub fn kind(self) -> ComponentKind {
        match self {
            BuiltinModel::Iaf => ComponentKind::Neuron,
            BuiltinModel::CobaSynapse => ComponentKind::Synapse,
            BuiltinModel::SpikeSourcePoisson | BuiltinModel::SpikeSourceArray => {
                ComponentKind::SpikeSource
            }
            BuiltinModel::ExplicitConnections
            | BuiltinModel::AllToAll
            | BuiltinModel::OneToOne
            | BuiltinModel::FixedProbability => ComponentKind::Connection,
            BuiltinModel::Uniform | BuiltinModel::Normal => ComponentKind::RandomDistribution,
        }
    }

    /// Parameters the implementation reads, with SI defaults where one
    /// exists.
    pub fn schema(self) -> Vec<ParameterSpec> {
        use Dimension::*;
        match self {
            BuiltinModel::Iaf => vec![
                ParameterSpec::required("C_m", Capacitance),
                ParameterSpec::required("g_L", Conductance),
                ParameterSpec::required("E_L", Voltage),
                ParameterSpec::required("V_th", Voltage),
                ParameterSpec::required("V_reset", Voltage),
                ParameterSpec::optional("t_ref", Time, 0.0),
                ParameterSpec::optional("I_offset", Current, 0.0),
            ],
            BuiltinModel::CobaSynapse => vec![
                ParameterSpec::required("tau_syn", Time),
                ParameterSpec::required("E_rev", Voltage),
            ],
            BuiltinModel::SpikeSourcePoisson => vec![
                ParameterSpec::required("rate", Frequency),
                ParameterSpec::required("duration", Time),
                ParameterSpec::optional("t0", Time, 0.0),
            ],
            BuiltinModel::SpikeSourceArray => vec![ParameterSpec::array("spike_times", Time)],
            BuiltinModel::ExplicitConnections => Vec::new(),
            BuiltinModel::AllToAll => vec![
                ParameterSpec::required("weight", Conductance),
                ParameterSpec::required("delay", Time),
                ParameterSpec::optional("autapses", Dimensionless, 1.0),
            ],
            BuiltinModel::OneToOne => vec![
                ParameterSpec::required("weight", Conductance),
                ParameterSpec::required("delay", Time),
            ],
            BuiltinModel::FixedProbability => vec![
                ParameterSpec::required("p", Dimensionless),
                ParameterSpec::required("weight", Conductance),
                ParameterSpec::required("delay", Time),
                ParameterSpec::optional("autapses", Dimensionless, 1.0),
            ],
            BuiltinModel::Uniform => vec![
                ParameterSpec::required("low", Dimensionless),
                ParameterSpec::required("high", Dimensionless),
            ],
            BuiltinModel::Normal => vec![
                ParameterSpec::required("mean", Dimensionless),
                ParameterSpec::required("std", Dimensionless),
            ],
        }
    }
}

impl FromStr for BuiltinModel {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuiltinModel::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| ModelError::Resolution {
                reference: s.to_owned(),
                reason:    "not a built-in component and not a .json file".to_owned(),
            })
    }
}

impl fmt::Display for BuiltinModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── ParameterSpec ─────────────────────────────────────────────────────────────

/// One entry of a component's parameter schema.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name:      String,
    pub dimension: Dimension,
    /// SI default used when the declaration omits the parameter.
    #[serde(default)]
    pub default:   Option<f64>,
    /// The parameter holds a list of values (e.g. spike times).
    #[serde(default)]
    pub array:     bool,
}

impl ParameterSpec {
    pub fn required(name: &str, dimension: Dimension) -> Self {
        Self { name: name.to_owned(), dimension, default: None, array: false }
    }

    pub fn optional(name: &str, dimension: Dimension, default: f64) -> Self {
        Self { name: name.to_owned(), dimension, default: Some(default), array: false }
    }

    pub fn array(name: &str, dimension: Dimension) -> Self {
        Self { name: name.to_owned(), dimension, default: None, array: true }
    }
}

// ── ComponentDefinition ───────────────────────────────────────────────────────

/// A resolved component: implementation plus parameter schema.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ComponentDefinition {
    pub name:       String,
    pub model:      BuiltinModel,
    pub parameters: Vec<ParameterSpec>,
}

impl ComponentDefinition {
    /// The definition of a built-in model under its own name.
    pub fn builtin(model: BuiltinModel) -> Self {
        Self { name: model.name().to_owned(), model, parameters: model.schema() }
    }

    #[inline]
    pub fn kind(&self) -> ComponentKind {
        self.model.kind()
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Check the schema is well formed and covers everything the backing
    /// model reads.  `reference` is used in error messages only.
    pub fn validate(&self, reference: &str) -> ModelResult<()> {
        let malformed = |reason: String| ModelError::ComponentParse {
            reference: reference.to_owned(),
            reason,
        };

        for (i, spec) in self.parameters.iter().enumerate() {
            if !is_identifier(&spec.name) {
                return Err(malformed(format!("parameter name {:?} is not an identifier", spec.name)));
            }
            if self.parameters[..i].iter().any(|p| p.name == spec.name) {
                return Err(malformed(format!("parameter {:?} is declared twice", spec.name)));
            }
        }

        for needed in self.model.schema() {
            match self.parameter(&needed.name) {
                None => {
                    return Err(malformed(format!(
                        "model {} needs parameter {:?}",
                        self.model, needed.name
                    )));
                }
                Some(spec) if spec.dimension != needed.dimension || spec.array != needed.array => {
                    return Err(malformed(format!(
                        "parameter {:?} must be a {}{}",
                        needed.name,
                        needed.dimension,
                        if needed.array { " array" } else { "" }
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
