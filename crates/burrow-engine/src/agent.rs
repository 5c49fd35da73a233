//! Agents: unique movers driving their own move loop.

use std::thread;
use std::time::Duration;

use burrow_core::{AgentId, WorldInstanceId};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::DelayConfig;
use crate::movement::MoveOutcome;
use crate::world::World;

/// An agent's private state: its id, home world, and RNG.
///
/// The agent's position lives in its [`World`] so that renderers can scan
/// it. An `Agent` is a unique token, neither `Clone` nor constructible
/// outside [`World::spawn_with`], and moving requires `&mut Agent`. That
/// makes the agent the single writer of its position.
#[derive(Debug)]
pub struct Agent {
    id: AgentId,
    world: WorldInstanceId,
    pub(crate) rng: ChaCha8Rng,
}

impl Agent {
    pub(crate) fn new(id: AgentId, world: WorldInstanceId, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(u64::from(id.0));
        Self { id, world, rng }
    }

    /// This agent's id.
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// The world this agent was spawned into.
    pub fn world_id(&self) -> WorldInstanceId {
        self.world
    }

    /// Make one move attempt in `world`.
    pub fn step(&mut self, world: &World) -> MoveOutcome {
        world.attempt_move(self)
    }

    /// Draw the pause before the next attempt.
    pub fn next_delay(&mut self, delay: &DelayConfig) -> Duration {
        delay.sample(&mut self.rng)
    }

    /// Run the move loop: attempt, pause, repeat.
    ///
    /// With `ticks = None` this never returns. With `Some(n)` it returns
    /// after `n` attempts (and `n` pauses).
    pub fn run(&mut self, world: &World, delay: &DelayConfig, ticks: Option<u64>) {
        let mut done = 0u64;
        while ticks.is_none_or(|limit| done < limit) {
            self.step(world);
            let pause = self.next_delay(delay);
            thread::sleep(pause);
            done += 1;
        }
    }
}
