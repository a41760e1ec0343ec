//! Report variable paths.

use std::fmt;
use std::str::FromStr;

use crate::{ModelError, ModelResult, is_identifier};

/// `Group.Population[index].variable`
///
/// `variable` may itself contain dots (`Exc_Inh.g` addresses the
/// conductance of the synapse from projection `Exc_Inh`).
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct VariablePath {
    pub group:      String,
    pub population: String,
    pub index:      usize,
    pub variable:   String,
}

impl FromStr for VariablePath {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        let bad = |reason: &str| ModelError::VariablePath {
            path:   s.to_owned(),
            reason: reason.to_owned(),
        };

        let (head, rest) = s.split_once('[').ok_or_else(|| bad("missing '[index]'"))?;
        let (index, tail) = rest.split_once(']').ok_or_else(|| bad("unterminated '['"))?;
        let variable = tail
            .strip_prefix('.')
            .ok_or_else(|| bad("expected '.variable' after the index"))?;
        let (group, population) = head
            .rsplit_once('.')
            .ok_or_else(|| bad("expected 'Group.Population' before the index"))?;

        let index: usize = index
            .trim()
            .parse()
            .map_err(|_| bad("index is not a non-negative integer"))?;

        if !is_identifier(group) || !is_identifier(population) {
            return Err(bad("group and population must be identifiers"));
        }
        if variable.is_empty() || !variable.split('.').all(is_identifier) {
            return Err(bad("variable must be a dotted identifier"));
        }

        Ok(Self {
            group:      group.to_owned(),
            population: population.to_owned(),
            index,
            variable:   variable.to_owned(),
        })
    }
}

impl fmt::Display for VariablePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}[{}].{}", self.group, self.population, self.index, self.variable)
    }
}
