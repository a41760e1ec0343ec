//! Component reference resolution.
//!
//! A component declaration names its definition with a textual reference.
//! Bare names (`"iaf"`) resolve against the built-in [`Catalog`]; references
//! ending in `.json` are read from disk by [`JsonFileLoader`].  The
//! [`DefaultLoader`] combines both and is what the assembler uses unless a
//! caller supplies its own [`ComponentLoader`].

use std::path::{Path, PathBuf};

use crate::{BuiltinModel, ComponentDefinition, ModelError, ModelResult};

/// Resolves a textual component reference to a typed definition.
///
/// Implementations fail with [`ModelError::Resolution`] when the reference
/// cannot be reached and [`ModelError::ComponentParse`] when it was reached
/// but is malformed.
pub trait ComponentLoader {
    fn resolve(&self, reference: &str) -> ModelResult<ComponentDefinition>;
}

// ── Catalog ───────────────────────────────────────────────────────────────────

/// The built-in component set.
#[derive(Debug, Default, Clone, Copy)]
pub struct Catalog;

impl ComponentLoader for Catalog {
    fn resolve(&self, reference: &str) -> ModelResult<ComponentDefinition> {
        let model: BuiltinModel = reference.parse()?;
        Ok(ComponentDefinition::builtin(model))
    }
}

// ── JsonFileLoader ────────────────────────────────────────────────────────────

/// Reads a [`ComponentDefinition`] serialised as JSON.
///
/// Relative references are resolved against `base_dir` (normally the
/// directory containing the experiment file).
#[derive(Debug, Clone)]
pub struct JsonFileLoader {
    base_dir: PathBuf,
}

impl JsonFileLoader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }

    fn path_for(&self, reference: &str) -> PathBuf {
        let path = Path::new(reference);
        if path.is_absolute() { path.to_path_buf() } else { self.base_dir.join(path) }
    }
}

impl ComponentLoader for JsonFileLoader {
    fn resolve(&self, reference: &str) -> ModelResult<ComponentDefinition> {
        let path = self.path_for(reference);
        let text = std::fs::read_to_string(&path).map_err(|e| ModelError::Resolution {
            reference: reference.to_owned(),
            reason:    format!("{}: {e}", path.display()),
        })?;
        let definition: ComponentDefinition =
            serde_json::from_str(&text).map_err(|e| ModelError::ComponentParse {
                reference: reference.to_owned(),
                reason:    e.to_string(),
            })?;
        definition.validate(reference)?;
        Ok(definition)
    }
}

// ── DefaultLoader ─────────────────────────────────────────────────────────────

/// Catalog for bare names, JSON files for `*.json` references.
#[derive(Debug, Clone)]
pub struct DefaultLoader {
    files: JsonFileLoader,
}

impl DefaultLoader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { files: JsonFileLoader::new(base_dir) }
    }
}

impl Default for DefaultLoader {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ComponentLoader for DefaultLoader {
    fn resolve(&self, reference: &str) -> ModelResult<ComponentDefinition> {
        if reference.ends_with(".json") {
            self.files.resolve(reference)
        } else {
            Catalog.resolve(reference)
        }
    }
}
