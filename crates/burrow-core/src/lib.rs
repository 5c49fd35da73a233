//! Core types for the Burrow grid simulation.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! value types shared by every other Burrow crate: grid [`Cell`]s, the four
//! cardinal [`Direction`]s, and strongly-typed
//! [`AgentId`]s and [`WorldInstanceId`]s.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod id;

pub use cell::{Cell, Direction};
pub use id::{AgentId, WorldInstanceId};
