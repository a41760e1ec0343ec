//! `pnn-core` — foundational types for point-neuron network simulation.
//!
//! This crate is a dependency of every other `pnn-*` crate.  It has no
//! `pnn-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `NeuronId`, `PopulationId`, `ProjectionId`, `GroupId`     |
//! | [`time`]        | `RunConfig`, `ReportingBoundaries`                        |
//! | [`units`]       | `Unit`, `Dimension`, `Quantity`                           |
//! | [`rng`]         | `SimRng` (global), `StreamRng` (per random distribution)  |
//! | [`error`]       | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod ids;
pub mod rng;
pub mod time;
pub mod units;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{GroupId, NeuronId, PopulationId, ProjectionId};
pub use rng::{SimRng, StreamRng};
pub use time::{ReportingBoundaries, RunConfig};
pub use units::{Dimension, Quantity, Unit};
