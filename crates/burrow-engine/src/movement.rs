//! The move attempt: propose, lock, re-check, commit or abort, unlock.
//!
//! Under [`Protocol::OrderedPair`] a move from `from` to `to` holds the
//! locks of exactly those two cells, taken lower canonical rank first.
//! Any two movers that could collide share at least one of their cells, so
//! they contend on a common lock and their check-and-commit sections never
//! overlap. Movers on disjoint cells proceed in parallel.
//!
//! Under [`Protocol::Global`] the same check-and-commit runs behind one
//! world-wide lock instead.

use std::fmt;
use std::sync::atomic::Ordering;

use burrow_core::{AgentId, Cell};
use rand::seq::IndexedRandom;

use crate::agent::Agent;
use crate::config::Protocol;
use crate::world::World;

/// Result of a single move attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The agent moved.
    Moved {
        /// Cell left.
        from: Cell,
        /// Cell entered.
        to: Cell,
    },
    /// The destination was occupied when re-checked under lock. Nothing
    /// changed.
    Blocked {
        /// Current cell.
        from: Cell,
        /// Proposed cell.
        to: Cell,
        /// Agent found on `to`.
        occupant: AgentId,
    },
    /// No legal neighbour exists (1x1 grid). Nothing changed.
    Stuck {
        /// Current cell.
        at: Cell,
    },
}

impl MoveOutcome {
    /// Whether the agent changed cell.
    pub fn is_moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }

    /// Where the agent is after the attempt.
    pub fn position(&self) -> Cell {
        match *self {
            Self::Moved { to, .. } => to,
            Self::Blocked { from, .. } => from,
            Self::Stuck { at } => at,
        }
    }
}

impl fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Moved { from, to } => write!(f, "moved {from} -> {to}"),
            Self::Blocked { from, to, occupant } => {
                write!(f, "blocked {from} -> {to} by agent {occupant}")
            }
            Self::Stuck { at } => write!(f, "stuck at {at}"),
        }
    }
}

impl World {
    /// Make one move attempt for `agent`.
    ///
    /// Picks a uniformly random legal neighbour with the agent's RNG, then
    /// synchronises according to the world's [`Protocol`]. Blocks while
    /// another mover holds a needed lock. All locks are released before
    /// returning.
    ///
    /// # Panics
    ///
    /// Panics if `agent` was spawned by a different world, or if the
    /// origin and destination share a canonical rank (a broken candidate
    /// invariant, never a race).
    pub fn attempt_move(&self, agent: &mut Agent) -> MoveOutcome {
        assert_eq!(
            agent.world_id(),
            self.instance_id(),
            "agent {} belongs to world {}, not {}",
            agent.id(),
            agent.world_id(),
            self.instance_id()
        );
        let id = agent.id();
        let slot = &self.agents[id.index()];
        // Only this agent writes its own slot, so this read cannot go stale
        // before the commit below.
        let from = self.load(slot);

        let candidates = self.neighbours(from);
        let outcome = match candidates.choose(&mut agent.rng) {
            None => MoveOutcome::Stuck { at: from },
            Some(&to) => {
                let grid = self.grid();
                let (Some(a), Some(b)) = (grid.canonical_rank(from), grid.canonical_rank(to)) else {
                    unreachable!("positions and their neighbours are always in bounds");
                };
                match self.protocol() {
                    Protocol::OrderedPair => {
                        let _pair = self.locks().lock_pair(a, b);
                        self.commit_if_free(id, from, to, b)
                    }
                    Protocol::Global => {
                        let _world = self.global_lock();
                        self.commit_if_free(id, from, to, b)
                    }
                }
            }
        };

        self.counters.record(&outcome);
        tracing::trace!(agent = %id, %outcome, "move attempt");
        outcome
    }

    /// Re-check `to` and publish the new position if it is free.
    ///
    /// Callers must hold whatever lock their protocol uses to guard both
    /// `from` and `to`.
    fn commit_if_free(&self, id: AgentId, from: Cell, to: Cell, to_rank: usize) -> MoveOutcome {
        if let Some(occupant) = self.occupant_at(to) {
            return MoveOutcome::Blocked { from, to, occupant };
        }
        self.agents[id.index()]
            .position
            .store(to_rank, Ordering::Release);
        MoveOutcome::Moved { from, to }
    }
}
