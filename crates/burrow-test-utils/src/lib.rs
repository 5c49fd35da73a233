//! Test fixtures and concurrency harnesses for Burrow development.
//!
//! Provides seeded world construction, collision assertions, and
//! [`drive_concurrently`], which runs agents on real threads with an
//! overall deadline so a deadlock fails the test instead of hanging it.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use burrow_core::{AgentId, Cell};
use burrow_engine::{Agent, DelayConfig, MoveOutcome, Placement, World};

/// Default deadline for concurrent tests. Generous: it only has to catch
/// hangs, not measure speed.
pub const DEADLINE: Duration = Duration::from_secs(60);

/// Smallest practical delay, for runs that go through `Agent::run`.
pub fn fast_delay() -> DelayConfig {
    DelayConfig::fixed(Duration::from_micros(1))
}

/// Build a `width x height` world with `agents` spawned under `placement`.
///
/// # Panics
///
/// Panics if the dimensions or placement are invalid.
pub fn seeded_world(
    width: u32,
    height: u32,
    agents: usize,
    placement: Placement,
    seed: u64,
) -> (World, Vec<Agent>) {
    let mut world = World::new(width, height).expect("fixture grid dimensions must be valid");
    let agents = world
        .spawn_with(agents, placement, seed)
        .expect("fixture placement must fit the grid");
    (world, agents)
}

/// Panic if any two agents share a cell or any agent is out of bounds.
pub fn assert_no_collisions(world: &World, positions: &[Cell]) {
    let mut seen: HashMap<Cell, AgentId> = HashMap::with_capacity(positions.len());
    for (i, &cell) in positions.iter().enumerate() {
        let id = AgentId(i as u32);
        assert!(
            world.grid().contains(cell),
            "agent {id} out of bounds at {cell}"
        );
        if let Some(other) = seen.insert(cell, id) {
            panic!("agents {other} and {id} both occupy {cell}");
        }
    }
}

/// Step every agent `ticks` times on its own thread, with no pause between
/// attempts, calling `after_each` on the world after every attempt.
///
/// Returns the agents in id order. Panics if any thread panics or if the
/// whole run does not finish within `deadline`.
pub fn drive_concurrently<F>(
    world: &Arc<World>,
    agents: Vec<Agent>,
    ticks: u64,
    deadline: Duration,
    after_each: F,
) -> Vec<Agent>
where
    F: Fn(&World, &MoveOutcome) + Send + Sync + 'static,
{
    let total = agents.len();
    let after_each = Arc::new(after_each);
    let (done_tx, done_rx) = crossbeam_channel::bounded(total.max(1));

    let handles: Vec<_> = agents
        .into_iter()
        .map(|mut agent| {
            let world = Arc::clone(world);
            let after_each = Arc::clone(&after_each);
            let done_tx = done_tx.clone();
            thread::Builder::new()
                .name(format!("test-agent-{}", agent.id()))
                .spawn(move || {
                    for _ in 0..ticks {
                        let outcome = agent.step(&world);
                        after_each(world.as_ref(), &outcome);
                    }
                    let _ = done_tx.send(agent.id());
                    agent
                })
                .expect("failed to spawn test agent thread")
        })
        .collect();
    drop(done_tx);

    let end = Instant::now() + deadline;
    for finished in 0..total {
        match done_rx.recv_deadline(end) {
            Ok(_) => {}
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
                panic!("only {finished} of {total} agents finished within {deadline:?}")
            }
        }
    }

    handles
        .into_iter()
        .map(|h| h.join().expect("agent thread panicked"))
        .collect()
}
