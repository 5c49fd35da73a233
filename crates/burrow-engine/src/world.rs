//! The shared grid world: dimensions, lock table, and agent positions.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use burrow_core::{AgentId, Cell, WorldInstanceId};
use burrow_space::{Grid, LockTable, SpaceError};
use smallvec::SmallVec;

use crate::agent::Agent;
use crate::config::{Placement, Protocol};
use crate::metrics::{MoveCounters, MoveStats};

// ── SpawnError ─────────────────────────────────────────────────────

/// Errors from [`World::spawn`] and friends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpawnError {
    /// Agents were already spawned into this world. The agent set is fixed
    /// once populated.
    AlreadySpawned {
        /// Number of agents already present.
        existing: usize,
    },
    /// More agents were requested than can be placed or identified.
    TooManyAgents {
        /// Requested agent count.
        requested: usize,
        /// Maximum supported by the grid or id space.
        capacity: usize,
    },
}

impl fmt::Display for SpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadySpawned { existing } => {
                write!(f, "world already populated with {existing} agents")
            }
            Self::TooManyAgents {
                requested,
                capacity,
            } => write!(f, "cannot place {requested} agents, capacity is {capacity}"),
        }
    }
}

impl std::error::Error for SpawnError {}

// ── World ──────────────────────────────────────────────────────────

/// Per-agent state visible to every thread.
///
/// `position` holds the canonical rank of the agent's cell. It has exactly
/// one writer (the agent, while holding the locks of both cells involved)
/// and is published with `Release` so unlocked readers never see a torn or
/// stale-beyond-one-move value.
#[derive(Debug)]
pub(crate) struct AgentSlot {
    pub(crate) position: AtomicUsize,
}

/// A bounded grid shared by concurrently moving agents.
///
/// Built once with fixed dimensions, populated once with
/// [`spawn`](Self::spawn), then shared (typically behind an `Arc`) by the
/// agent threads and any renderer.
#[derive(Debug)]
pub struct World {
    instance_id: WorldInstanceId,
    grid: Grid,
    locks: LockTable,
    protocol: Protocol,
    global: Mutex<()>,
    pub(crate) agents: Vec<AgentSlot>,
    pub(crate) counters: MoveCounters,
}

// Compile-time assertion: World must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<World>();
};

impl World {
    /// Create an empty world using the ordered-pair protocol.
    ///
    /// Fails fast if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, SpaceError> {
        Self::with_protocol(width, height, Protocol::OrderedPair)
    }

    /// Create an empty world using `protocol` for every move.
    pub fn with_protocol(width: u32, height: u32, protocol: Protocol) -> Result<Self, SpaceError> {
        let grid = Grid::new(width, height)?;
        Ok(Self {
            instance_id: WorldInstanceId::next(),
            grid,
            locks: LockTable::new(grid),
            protocol,
            global: Mutex::new(()),
            agents: Vec::new(),
            counters: MoveCounters::default(),
        })
    }

    /// Populate the world with `count` agents starting on the origin.
    ///
    /// Equivalent to `spawn_with(count, Placement::Origin, 0)`.
    pub fn spawn(&mut self, count: usize) -> Result<Vec<Agent>, SpawnError> {
        self.spawn_with(count, Placement::Origin, 0)
    }

    /// Populate the world with `count` agents.
    ///
    /// Ids are assigned `0..count` in creation order. Agent `i` gets a
    /// ChaCha8 RNG seeded with `seed` on stream `i`. May be called at most
    /// once; the agent set is fixed afterwards.
    pub fn spawn_with(
        &mut self,
        count: usize,
        placement: Placement,
        seed: u64,
    ) -> Result<Vec<Agent>, SpawnError> {
        if !self.agents.is_empty() {
            return Err(SpawnError::AlreadySpawned {
                existing: self.agents.len(),
            });
        }
        let id_capacity = u32::MAX as usize;
        let capacity = match placement {
            Placement::Origin => id_capacity,
            Placement::Distinct => self.grid.cell_count().min(id_capacity),
        };
        if count > capacity {
            return Err(SpawnError::TooManyAgents {
                requested: count,
                capacity,
            });
        }

        self.agents = (0..count)
            .map(|i| AgentSlot {
                position: AtomicUsize::new(match placement {
                    Placement::Origin => 0,
                    Placement::Distinct => i,
                }),
            })
            .collect();

        tracing::debug!(
            world = %self.instance_id,
            count,
            ?placement,
            "spawned agents"
        );

        Ok((0..count as u32)
            .map(|i| Agent::new(AgentId(i), self.instance_id, seed))
            .collect())
    }

    /// Identity of this world instance.
    pub fn instance_id(&self) -> WorldInstanceId {
        self.instance_id
    }

    /// The grid geometry.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        self.grid.dimensions()
    }

    /// Synchronisation protocol used by every move.
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Number of agents. Fixed after [`spawn`](Self::spawn).
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Legal moves out of `cell`, in left/up/right/down order.
    pub fn neighbours(&self, cell: Cell) -> SmallVec<[Cell; 4]> {
        self.grid.neighbours(cell)
    }

    /// The lock guarding `cell`, or `None` if it is out of bounds.
    pub fn lock_for(&self, cell: Cell) -> Option<&Mutex<()>> {
        self.locks.lock_for(cell)
    }

    /// Current position of `id`, read without locking.
    pub fn position(&self, id: AgentId) -> Option<Cell> {
        self.agents.get(id.index()).map(|slot| self.load(slot))
    }

    /// Which agent occupies `cell`, by linear scan of positions.
    ///
    /// Never blocks. Without the cell's lock the answer is only a
    /// best-effort snapshot; with the lock held it is exact for that cell.
    /// If several agents share the cell, the lowest id wins.
    pub fn occupant_at(&self, cell: Cell) -> Option<AgentId> {
        let rank = self.grid.canonical_rank(cell)?;
        self.agents
            .iter()
            .position(|slot| slot.position.load(Ordering::Acquire) == rank)
            .map(|i| AgentId(i as u32))
    }

    /// Every agent's position, indexed by id, read without locking.
    pub fn positions(&self) -> Vec<Cell> {
        self.agents.iter().map(|slot| self.load(slot)).collect()
    }

    /// Every agent's position, read while no move can commit.
    ///
    /// Holds every cell lock (ascending rank) under the ordered-pair
    /// protocol, or the world lock under the global protocol, so the result
    /// is a consistent cut that never deadlocks against movers.
    pub fn locked_positions(&self) -> Vec<Cell> {
        let _guards = self.exclude_movers();
        self.positions()
    }

    /// Cumulative move attempt counters.
    pub fn move_stats(&self) -> MoveStats {
        self.counters.snapshot()
    }

    /// Render the current occupancy as text. See [`crate::render::render`].
    pub fn snapshot(&self) -> String {
        crate::render::render(self)
    }

    pub(crate) fn locks(&self) -> &LockTable {
        &self.locks
    }

    pub(crate) fn global_lock(&self) -> MutexGuard<'_, ()> {
        self.global.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn load(&self, slot: &AgentSlot) -> Cell {
        let rank = slot.position.load(Ordering::Acquire);
        // Positions only ever hold ranks produced by this grid.
        self.grid.cell_at(rank).unwrap_or(Cell::ORIGIN)
    }

    fn exclude_movers(&self) -> Vec<MutexGuard<'_, ()>> {
        match self.protocol {
            Protocol::OrderedPair => self.locks.lock_all(),
            Protocol::Global => vec![self.global_lock()],
        }
    }
}
