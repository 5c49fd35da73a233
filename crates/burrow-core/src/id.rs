//! Strongly-typed agent and world identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies an agent within a world.
///
/// Ids are assigned sequentially at spawn time, so `AgentId(n)` is the
/// n-th agent created and also its slot index in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(pub u32);

impl AgentId {
    /// Slot index of this agent.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for AgentId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Counter for unique [`WorldInstanceId`] allocation.
static WORLD_INSTANCE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for a world.
///
/// Allocated from a monotonic atomic counter via [`WorldInstanceId::next`].
/// Agents remember the world that spawned them, so an agent can never be
/// driven against another world's lock table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorldInstanceId(u64);

impl WorldInstanceId {
    /// Allocate a fresh, unique instance ID. Thread-safe.
    pub fn next() -> Self {
        Self(WORLD_INSTANCE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for WorldInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
