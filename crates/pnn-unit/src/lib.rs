//! `pnn-unit` — simulation units and the spike event queue.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                          |
//! |----------------|-------------------------------------------------------------------|
//! | [`integrator`] | `Integrator` trait, `IntegratorFactory`, `BuiltinIntegrators`, `StopMode` |
//! | [`euler`]      | `EulerIaf` — fixed-step LIF + conductance synapses                |
//! | [`source`]     | `SpikeReplay`, `poisson_spike_times`                              |
//! | [`unit`]       | `NeuronUnit`, `SynapseUnit`, `UnitState`, `Destination`, `SpikeRecord` |
//! | [`queue`]      | `EventQueue`, `QueueEntry`, `InletPort`, `Drain`                  |
//! | [`error`]      | `UnitError`, `UnitResult<T>`                                      |
//!
//! # Design notes
//!
//! Units never own or reference the event queue.  The scheduler lends it
//! as `&mut EventQueue` to [`NeuronUnit::integrate_until`], and a firing
//! pushes one [`QueueEntry`] per downstream destination through that
//! borrow.  Callers that integrate many units concurrently use
//! [`NeuronUnit::advance`] instead, which only returns the firing times,
//! and replay them through [`NeuronUnit::on_spike`] afterwards on a single
//! thread.

pub mod error;
pub mod euler;
pub mod integrator;
pub mod queue;
pub mod source;
pub mod unit;

#[cfg(test)]
mod tests;

pub use error::{UnitError, UnitResult};
pub use euler::EulerIaf;
pub use integrator::{BuiltinIntegrators, Integrator, IntegratorFactory, StopMode, SynapseBinding};
pub use queue::{Drain, EventQueue, InletPort, QueueEntry};
pub use source::{SpikeReplay, poisson_spike_times};
pub use unit::{Destination, NeuronUnit, SpikeRecord, SynapseUnit, UnitState};
