//! Parameter binding and resolution.
//!
//! Binding happens once per component: each declared value is matched to
//! the definition's schema, dimension-checked and converted to SI.  The
//! result, a [`ParameterSet`], may still contain references to random
//! distributions.  Resolution happens once per unit instance and replaces
//! every such reference with a sample, producing plain [`Parameters`].

use std::collections::BTreeMap;

use crate::{ComponentDecl, ComponentDefinition, ModelError, ModelResult, ParameterValue};

// ── ParameterSet ──────────────────────────────────────────────────────────────

/// A bound parameter value in SI.
#[derive(Clone, PartialEq, Debug)]
pub enum BoundParameter {
    Fixed(f64),
    Array(Vec<f64>),
    /// Sample `distribution` and multiply by `scale`.
    Random {
        distribution: String,
        scale:        f64,
    },
}

#[derive(Clone, PartialEq, Debug)]
pub struct ParameterSet {
    component: String,
    values:    BTreeMap<String, BoundParameter>,
}

impl ParameterSet {
    /// Match `decl`'s values against `definition`'s schema.
    pub fn bind(decl: &ComponentDecl, definition: &ComponentDefinition) -> ModelResult<Self> {
        let component = decl.name.as_str();
        let mut values = BTreeMap::new();

        for (name, value) in &decl.parameters {
            let spec = definition.parameter(name).ok_or_else(|| ModelError::UnknownParameter {
                component: component.to_owned(),
                parameter: name.clone(),
            })?;

            let unit = match value {
                ParameterValue::Fixed(q) => q.unit,
                ParameterValue::Array { unit, .. } | ParameterValue::Random { unit, .. } => *unit,
            };
            if unit.dimension() != spec.dimension {
                return Err(ModelError::UnitMismatch {
                    component: component.to_owned(),
                    parameter: name.clone(),
                    expected:  spec.dimension,
                    found:     unit.dimension(),
                });
            }

            let is_array = matches!(value, ParameterValue::Array { .. });
            if is_array != spec.array {
                return Err(ModelError::InvalidParameter {
                    component: component.to_owned(),
                    parameter: name.clone(),
                    reason:    if spec.array {
                        "expected a list of values".to_owned()
                    } else {
                        "expected a single value".to_owned()
                    },
                });
            }

            let bound = match value {
                ParameterValue::Fixed(q) => BoundParameter::Fixed(q.to_si()),
                ParameterValue::Array { values, unit } => {
                    let f = unit.si_factor();
                    BoundParameter::Array(values.iter().map(|v| v * f).collect())
                }
                ParameterValue::Random { random, unit } => BoundParameter::Random {
                    distribution: random.clone(),
                    scale:        unit.si_factor(),
                },
            };
            values.insert(name.clone(), bound);
        }

        for spec in &definition.parameters {
            if values.contains_key(&spec.name) {
                continue;
            }
            match spec.default {
                Some(d) => {
                    values.insert(spec.name.clone(), BoundParameter::Fixed(d));
                }
                None => {
                    return Err(ModelError::MissingParameter {
                        component: component.to_owned(),
                        parameter: spec.name.clone(),
                    });
                }
            }
        }

        Ok(Self { component: component.to_owned(), values })
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn get(&self, name: &str) -> Option<&BoundParameter> {
        self.values.get(name)
    }

    /// `(parameter, distribution)` for every random reference.
    pub fn random_references(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().filter_map(|(name, v)| match v {
            BoundParameter::Random { distribution, .. } => Some((name.as_str(), distribution.as_str())),
            _ => None,
        })
    }

    /// Replace random references with samples drawn through `sample`, which
    /// is called with the distribution name once per reference.
    pub fn resolve<F>(&self, mut sample: F) -> ModelResult<Parameters>
    where
        F: FnMut(&str) -> ModelResult<f64>,
    {
        let mut values = BTreeMap::new();
        for (name, bound) in &self.values {
            let v = match bound {
                BoundParameter::Fixed(x) => ParamValue::Scalar(*x),
                BoundParameter::Array(xs) => ParamValue::Array(xs.clone()),
                BoundParameter::Random { distribution, scale } => {
                    ParamValue::Scalar(sample(distribution)? * scale)
                }
            };
            values.insert(name.clone(), v);
        }
        Ok(Parameters { component: self.component.clone(), values })
    }
}

// ── Parameters ────────────────────────────────────────────────────────────────

#[derive(Clone, PartialEq, Debug)]
pub enum ParamValue {
    Scalar(f64),
    Array(Vec<f64>),
}

/// Fully resolved SI parameter values for one unit instance.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Parameters {
    component: String,
    values:    BTreeMap<String, ParamValue>,
}

impl Parameters {
    pub fn new(component: &str) -> Self {
        Self { component: component.to_owned(), values: BTreeMap::new() }
    }

    pub fn with_scalar(mut self, name: &str, value: f64) -> Self {
        self.values.insert(name.to_owned(), ParamValue::Scalar(value));
        self
    }

    pub fn with_array(mut self, name: &str, values: Vec<f64>) -> Self {
        self.values.insert(name.to_owned(), ParamValue::Array(values));
        self
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn scalar(&self, name: &str) -> ModelResult<f64> {
        match self.values.get(name) {
            Some(ParamValue::Scalar(v)) => Ok(*v),
            Some(ParamValue::Array(_)) => Err(self.invalid(name, "expected a single value")),
            None => Err(self.missing(name)),
        }
    }

    pub fn array(&self, name: &str) -> ModelResult<&[f64]> {
        match self.values.get(name) {
            Some(ParamValue::Array(v)) => Ok(v),
            Some(ParamValue::Scalar(_)) => Err(self.invalid(name, "expected a list of values")),
            None => Err(self.missing(name)),
        }
    }

    /// Dimensionless switch: any non-zero value is `true`.
    pub fn flag(&self, name: &str) -> ModelResult<bool> {
        Ok(self.scalar(name)? != 0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn missing(&self, name: &str) -> ModelError {
        ModelError::MissingParameter {
            component: self.component.clone(),
            parameter: name.to_owned(),
        }
    }

    fn invalid(&self, name: &str, reason: &str) -> ModelError {
        ModelError::InvalidParameter {
            component: self.component.clone(),
            parameter: name.to_owned(),
            reason:    reason.to_owned(),
        }
    }
}
