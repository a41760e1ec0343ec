//! `pnn-network` — turn a [`ModelDescription`](pnn_model::ModelDescription)
//! into a wired [`Network`] of simulation units.
//!
//! # Crate layout
//!
//! | Module            | Contents                                              |
//! |-------------------|-------------------------------------------------------|
//! | [`assembler`]     | `Assembler` builder                                   |
//! | [`network`]       | `Network`, `Population`, `Projection`, `Group`, `SynapseRef` |
//! | [`distributions`] | `RandomDistributions` — sampled parameter values      |
//! | [`error`]         | `NetworkError`, `NetworkResult<T>`                    |
//!
//! # Naming
//!
//! Neurons are named `p{population_id}({index:04})` and synapses
//! `s(p{source_id},p{target_id})`.  Population ids are global, in group
//! then population declaration order.

pub mod assembler;
pub mod distributions;
pub mod error;
pub mod network;

#[cfg(test)]
mod tests;

pub use assembler::Assembler;
pub use distributions::RandomDistributions;
pub use error::{NetworkError, NetworkResult};
pub use network::{Group, Network, Population, Projection, SynapseRef};
