//! `pnn-connect` — connection tuples, connection generators, and `.conn` loading.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                       |
//! |-----------------|----------------------------------------------------------------|
//! | [`connection`]  | `Connection` (source, target, weight, delay, extra parameters) |
//! | [`generator`]   | `ConnectionGenerator`, `Mask`, `ExplicitList`, `AllToAll`, `OneToOne`, `FixedProbability`, `DelayTracked` |
//! | [`rule`]        | `ConnectionRule` — declarative rule → boxed generator          |
//! | [`loader`]      | `load_connections_file`, `load_connections_reader`             |
//! | [`error`]       | `ConnectError`, `ConnectResult<T>`                             |
//!
//! # Arity
//!
//! A raw connection row carries `source, target[, weight[, delay[, extra…]]]`.
//! Missing weight and delay default to `0.0`; fewer than two fields is a
//! validation error.
//!
//! Generators are lazy, finite and single-pass.  Wrap one in
//! [`DelayTracked`] to observe the minimum delay while it is consumed.

pub mod connection;
pub mod error;
pub mod generator;
pub mod loader;
pub mod rule;


pub use connection::Connection;
pub use error::{ConnectError, ConnectResult};
pub use generator::{
    AllToAll, ConnectionGenerator, DelayTracked, ExplicitList, FixedProbability, Mask, OneToOne,
};
pub use loader::{ConnectionScale, load_connections_file, load_connections_reader};
pub use rule::ConnectionRule;
