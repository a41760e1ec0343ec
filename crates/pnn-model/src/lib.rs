//! `pnn-model` — the declarative side of a simulation.
//!
//! Everything in this crate is read once, validated, and then treated as
//! immutable by the assembler and scheduler.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                           |
//! |-----------------|--------------------------------------------------------------------|
//! | [`description`] | `ModelDescription`, `ComponentDecl`, `GroupDecl`, `PopulationDecl`, `ProjectionDecl`, `ParameterValue` |
//! | [`component`]   | `ComponentDefinition`, `BuiltinModel`, `ComponentKind`, `ParameterSpec` |
//! | [`loader`]      | `ComponentLoader` trait, `Catalog`, `JsonFileLoader`, `DefaultLoader` |
//! | [`params`]      | `ParameterSet` (bound, unsampled), `Parameters` (resolved, SI)     |
//! | [`experiment`]  | `Experiment`, `Task`, `TimeCourse`, `ModelSource`                  |
//! | [`path`]        | `VariablePath` — `Group.Population[index].variable`                |
//! | [`error`]       | `ModelError`, `ModelResult<T>`                                     |
//!
//! # Parameter values
//!
//! Declared values keep their unit (`{"value": 0.2, "unit": "nF"}`) until
//! [`ParameterSet::bind`] checks them against the definition's schema and
//! converts them to SI.  A value may instead name a random-distribution
//! component (`{"random": "jitter", "unit": "mV"}`); it is sampled per unit
//! instance by [`ParameterSet::resolve`].

pub mod component;
pub mod description;
pub mod error;
pub mod experiment;
pub mod loader;
pub mod params;
pub mod path;


pub use component::{BuiltinModel, ComponentDefinition, ComponentKind, ParameterSpec, is_identifier};
pub use description::{
    ComponentDecl, GroupDecl, ModelDescription, ParameterValue, PopulationDecl, ProjectionDecl,
};
pub use error::{ModelError, ModelResult};
pub use experiment::{Experiment, ModelSource, Task, TimeCourse};
pub use loader::{Catalog, ComponentLoader, DefaultLoader, JsonFileLoader};
pub use params::{BoundParameter, ParamValue, ParameterSet, Parameters};
pub use path::VariablePath;
