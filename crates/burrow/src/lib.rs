//! Burrow: concurrent agents on a bounded grid.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Burrow sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use std::time::Duration;
//! use burrow::prelude::*;
//!
//! let sim = Simulation::new(WorldConfig {
//!     width: 4,
//!     height: 3,
//!     agents: 3,
//!     delay: DelayConfig::fixed(Duration::from_micros(1)),
//!     ..WorldConfig::default()
//! })
//! .unwrap();
//!
//! let running = sim.start(Some(50)).unwrap();
//! let world = std::sync::Arc::clone(running.world());
//! running.join().unwrap();
//!
//! assert_eq!(world.dimensions(), (4, 3));
//! assert_eq!(world.snapshot().lines().count(), 3);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `burrow-core` | `Cell`, `Direction`, ids |
//! | [`space`] | `burrow-space` | `Grid` geometry and the per-cell `LockTable` |
//! | [`engine`] | `burrow-engine` | `World`, agents, movement, rendering, threads |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core value types (`burrow-core`).
pub use burrow_core as types;

/// Grid geometry and cell locks (`burrow-space`).
pub use burrow_space as space;

/// World, movement protocol, agents, and rendering (`burrow-engine`).
pub use burrow_engine as engine;

/// Common imports for running a simulation.
pub mod prelude {
    pub use burrow_core::{AgentId, Cell, Direction};
    pub use burrow_engine::render::{glyph_for, run_render_loop};
    pub use burrow_engine::{
        Agent, ChannelSink, ConfigError, DelayConfig, MoveOutcome, MoveStats, Placement,
        Protocol, RunError, RunningSimulation, Simulation, SnapshotSink, SpawnError, World,
        WorldConfig, WriterSink,
    };
    pub use burrow_space::{Grid, SpaceError};
}
