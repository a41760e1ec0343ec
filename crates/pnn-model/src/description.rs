//! The model description document.
//!
//! ```json
//! {
//!   "name": "brunel",
//!   "components": [
//!     { "name": "exc", "definition": "iaf",
//!       "parameters": { "C_m": { "value": 0.2, "unit": "nF" }, … } },
//!     { "name": "wiring", "definition": "explicit_connections",
//!       "connection_file": "exc_exc.conn" }
//!   ],
//!   "groups": [
//!     { "name": "Network",
//!       "populations": [ { "name": "Exc", "number": 80, "prototype": "exc" } ],
//!       "projections": [ { "name": "E_E", "source": "Exc", "target": "Exc",
//!                          "connection": "wiring", "synapse": "ampa" } ] }
//!   ]
//! }
//! ```
//!
//! Components, groups, populations and projections keep their declaration
//! order; population ids are assigned from it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use pnn_core::{Quantity, Unit};

use crate::{ModelError, ModelResult, is_identifier};

// ── ParameterValue ────────────────────────────────────────────────────────────

/// A declared parameter value, before binding.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    /// `{"value": -60.0, "unit": "mV"}`
    Fixed(Quantity),
    /// `{"values": [10.0, 30.0], "unit": "ms"}`
    Array {
        values: Vec<f64>,
        unit:   Unit,
    },
    /// `{"random": "jitter", "unit": "mV"}`: one sample per unit instance.
    Random {
        random: String,
        unit:   Unit,
    },
}

// ── Declarations ──────────────────────────────────────────────────────────────

/// A named component: reference to a definition plus parameter values.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ComponentDecl {
    pub name:       String,
    /// Built-in model name or path to a `.json` definition.
    pub definition: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, ParameterValue>,
    /// Inline connection rows for `explicit_connections`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<Vec<Vec<f64>>>,
    /// Tab-separated connection file for `explicit_connections`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_file: Option<PathBuf>,
    /// `[weight, delay]` multipliers applied to `connection_file` rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_scale: Option<[f64; 2]>,
}

impl ComponentDecl {
    pub fn new(name: &str, definition: &str) -> Self {
        Self {
            name:             name.to_owned(),
            definition:       definition.to_owned(),
            parameters:       BTreeMap::new(),
            connections:      None,
            connection_file:  None,
            connection_scale: None,
        }
    }

    /// Builder-style helper for tests and programmatic models.
    pub fn with(mut self, parameter: &str, value: f64, unit: Unit) -> Self {
        self.parameters
            .insert(parameter.to_owned(), ParameterValue::Fixed(Quantity::new(value, unit)));
        self
    }

    pub fn with_value(mut self, parameter: &str, value: ParameterValue) -> Self {
        self.parameters.insert(parameter.to_owned(), value);
        self
    }

    pub fn with_connections(mut self, rows: Vec<Vec<f64>>) -> Self {
        self.connections = Some(rows);
        self
    }
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct PopulationDecl {
    pub name:      String,
    pub number:    usize,
    /// Component name of the neuron / spike-source prototype.
    pub prototype: String,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ProjectionDecl {
    pub name:       String,
    /// Source population name.
    pub source:     String,
    /// Target population name.
    pub target:     String,
    /// Component name of the connection rule.
    pub connection: String,
    /// Component name of the synapse prototype.
    pub synapse:    String,
}

#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct GroupDecl {
    pub name:        String,
    #[serde(default)]
    pub populations: Vec<PopulationDecl>,
    #[serde(default)]
    pub projections: Vec<ProjectionDecl>,
}

// ── ModelDescription ──────────────────────────────────────────────────────────

#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct ModelDescription {
    pub name:       String,
    #[serde(default)]
    pub components: Vec<ComponentDecl>,
    #[serde(default)]
    pub groups:     Vec<GroupDecl>,
}

impl ModelDescription {
    pub fn from_json_str(text: &str) -> ModelResult<Self> {
        let model: ModelDescription = serde_json::from_str(text)?;
        model.validate()?;
        Ok(model)
    }

    pub fn from_file(path: &Path) -> ModelResult<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    pub fn component(&self, name: &str) -> Option<&ComponentDecl> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn group(&self, name: &str) -> Option<&GroupDecl> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// All populations in declaration order across groups.
    pub fn populations(&self) -> impl Iterator<Item = (&GroupDecl, &PopulationDecl)> {
        self.groups
            .iter()
            .flat_map(|g| g.populations.iter().map(move |p| (g, p)))
    }

    /// Structural checks that do not need component definitions: names are
    /// identifiers and unique, and every referenced component exists.
    pub fn validate(&self) -> ModelResult<()> {
        let mut seen_components: Vec<&str> = Vec::with_capacity(self.components.len());
        for c in &self.components {
            check_name("component", &c.name, &mut seen_components)?;
            for p in c.parameters.keys() {
                if !is_identifier(p) {
                    return Err(ModelError::InvalidIdentifier(p.clone()));
                }
            }
        }

        let mut seen_groups: Vec<&str> = Vec::new();
        let mut seen_pops:   Vec<&str> = Vec::new();
        let mut seen_projs:  Vec<&str> = Vec::new();
        for g in &self.groups {
            check_name("group", &g.name, &mut seen_groups)?;
            for p in &g.populations {
                check_name("population", &p.name, &mut seen_pops)?;
                self.require_component(&p.prototype, &p.name)?;
            }
            for pr in &g.projections {
                check_name("projection", &pr.name, &mut seen_projs)?;
                self.require_component(&pr.connection, &pr.name)?;
                self.require_component(&pr.synapse, &pr.name)?;
            }
        }
        Ok(())
    }

    fn require_component(&self, name: &str, referenced_by: &str) -> ModelResult<()> {
        match self.component(name) {
            Some(_) => Ok(()),
            None => Err(ModelError::UnknownComponent {
                name:          name.to_owned(),
                referenced_by: referenced_by.to_owned(),
            }),
        }
    }
}

fn check_name<'a>(what: &'static str, name: &'a str, seen: &mut Vec<&'a str>) -> ModelResult<()> {
    if !is_identifier(name) {
        return Err(ModelError::InvalidIdentifier(name.to_owned()));
    }
    if seen.contains(&name) {
        return Err(ModelError::Duplicate { what, name: name.to_owned() });
    }
    seen.push(name);
    Ok(())
}
