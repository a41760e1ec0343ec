//! `pnn-sim` — event-driven co-simulation scheduler.
//!
//! # Boundary loop
//!
//! ```text
//! for next in interval, 2*interval, …, horizon:
//!   ① Drain    — pop queued events with delivery time <= next; for each:
//!                integrate the target to the delivery time, deliver to
//!                its inlet port, reinitialize.
//!   ② Advance  — integrate every unit behind `next` up to `next`
//!                (parallel with the `parallel` feature); firings push
//!                (fire_time + delay, port, target) onto the queue.
//!   ③ Progress — next / horizon.
//! ```
//!
//! Construction fails if the network's minimal delay is below the
//! reporting interval.  A drain phase delivering more than
//! `RunConfig::max_drain_events` events aborts the run.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | Initializes and advances units on Rayon's thread pool.   |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use pnn_network::Assembler;
//! use pnn_sim::{ProgressLogger, SchedulerBuilder};
//!
//! let network = Assembler::new(&model).seed(config.seed).assemble()?;
//! let mut scheduler = SchedulerBuilder::new(config, network).build()?;
//! let stats = scheduler.run(&mut ProgressLogger::default())?;
//! let network = scheduler.finalize()?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod scheduler;


pub use builder::SchedulerBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, ProgressLogger, SimObserver};
pub use scheduler::{RunStats, Scheduler};
