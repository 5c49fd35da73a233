//! Cumulative move attempt counters.
//!
//! [`MoveStats`] is a plain snapshot; the live counters are relaxed atomics
//! bumped by every attempt. They are diagnostics only and never take part
//! in synchronising moves.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::movement::MoveOutcome;

/// Totals of move attempts since the world was built.
///
/// Counters are read independently, so a snapshot taken while agents run
/// may be off by in-flight attempts: `attempts` can briefly exceed
/// `moved + blocked + stuck`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveStats {
    /// Attempts started.
    pub attempts: u64,
    /// Attempts that committed a new position.
    pub moved: u64,
    /// Attempts aborted because the destination was occupied.
    pub blocked: u64,
    /// Attempts with no legal neighbour.
    pub stuck: u64,
}

#[derive(Debug, Default)]
pub(crate) struct MoveCounters {
    attempts: AtomicU64,
    moved: AtomicU64,
    blocked: AtomicU64,
    stuck: AtomicU64,
}

impl MoveCounters {
    pub(crate) fn record(&self, outcome: &MoveOutcome) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        let counter = match outcome {
            MoveOutcome::Moved { .. } => &self.moved,
            MoveOutcome::Blocked { .. } => &self.blocked,
            MoveOutcome::Stuck { .. } => &self.stuck,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> MoveStats {
        MoveStats {
            attempts: self.attempts.load(Ordering::Relaxed),
            moved: self.moved.load(Ordering::Relaxed),
            blocked: self.blocked.load(Ordering::Relaxed),
            stuck: self.stuck.load(Ordering::Relaxed),
        }
    }
}
