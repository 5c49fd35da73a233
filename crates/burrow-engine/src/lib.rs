//! Concurrent movement engine for Burrow simulations.
//!
//! A [`World`] owns a fixed grid, one lock per cell, and the positions of a
//! fixed set of agents. Each [`Agent`] runs on its own thread and repeatedly
//! attempts to step to a random neighbouring cell:
//!
//! ```text
//! propose neighbour ─► lock {from, to} in canonical order ─► re-check `to`
//!        ▲                                                     │
//!        │                                  free: commit / taken: abort
//!        └──── sleep(delay) ◄──── release both locks ◄─────────┘
//! ```
//!
//! Renderers read positions without taking any cell lock; see [`render`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod agent;
pub mod config;
pub mod metrics;
pub mod movement;
pub mod render;
pub mod runner;
pub mod world;

pub use agent::Agent;
pub use config::{ConfigError, DelayConfig, Placement, Protocol, WorldConfig};
pub use metrics::MoveStats;
pub use movement::MoveOutcome;
pub use render::{ChannelSink, SnapshotSink, WriterSink};
pub use runner::{RunError, RunningSimulation, Simulation};
pub use world::{SpawnError, World};
