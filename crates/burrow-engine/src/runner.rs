//! Agent threads: one long-lived OS thread per agent.
//!
//! [`Simulation`] validates a [`WorldConfig`], builds the world, and spawns
//! the agents. [`Simulation::start`] moves each [`Agent`] onto its own named
//! thread running [`Agent::run`]. There is no stop signal: unbounded runs
//! last until the process exits, bounded runs end after their tick limit.
//!
//! ```text
//! Caller thread                 burrow-agent-<id> (N)
//!     |                             |
//!     |--start(ticks)-------------->| loop {
//!     |                             |   world.attempt_move(agent)
//!     |  render / locked reads      |   sleep(delay)
//!     |                             | }
//!     |<--done_rx: AgentId----------| (bounded runs only)
//!     |--join / join_within-------->| JoinHandle<Agent>
//! ```

use std::fmt;
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use burrow_core::AgentId;
use crossbeam_channel::{Receiver, RecvTimeoutError};

use crate::agent::Agent;
use crate::config::{ConfigError, DelayConfig, WorldConfig};
use crate::render::{run_render_loop_while, SnapshotSink};
use crate::world::World;

// ── RunError ─────────────────────────────────────────────────────

/// Errors from starting or joining agent threads.
#[derive(Debug, PartialEq, Eq)]
pub enum RunError {
    /// An agent thread could not be spawned.
    ThreadSpawnFailed {
        /// Agent whose thread failed to start.
        agent: AgentId,
        /// OS error description.
        reason: String,
    },
    /// An agent thread panicked.
    AgentPanicked {
        /// The agent whose thread died.
        agent: AgentId,
    },
    /// Not every agent finished before the deadline.
    DeadlineExceeded {
        /// Agents that finished in time.
        finished: usize,
        /// Agents that were running.
        total: usize,
    },
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ThreadSpawnFailed { agent, reason } => {
                write!(f, "could not spawn thread for agent {agent}: {reason}")
            }
            Self::AgentPanicked { agent } => write!(f, "agent {agent} panicked"),
            Self::DeadlineExceeded { finished, total } => {
                write!(f, "only {finished} of {total} agents finished before the deadline")
            }
        }
    }
}

impl std::error::Error for RunError {}

// ── Simulation ───────────────────────────────────────────────────

/// A populated world whose agents have not started moving yet.
#[derive(Debug)]
pub struct Simulation {
    world: Arc<World>,
    agents: Vec<Agent>,
    delay: DelayConfig,
}

impl Simulation {
    /// Validate `config`, build the world, and spawn its agents.
    ///
    /// Fails before any agent exists if the configuration is invalid.
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut world = World::with_protocol(config.width, config.height, config.protocol)?;
        let agents = world.spawn_with(config.agents, config.placement, config.seed)?;
        Ok(Self {
            world: Arc::new(world),
            agents,
            delay: config.delay,
        })
    }

    /// The shared world.
    pub fn world(&self) -> &Arc<World> {
        &self.world
    }

    /// The spawned agents, in id order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Launch one thread per agent.
    ///
    /// With `ticks = Some(n)` every agent makes `n` attempts and its thread
    /// exits; with `None` the threads run until the process ends.
    pub fn start(self, ticks: Option<u64>) -> Result<RunningSimulation, RunError> {
        let total = self.agents.len();
        let (done_tx, done_rx) = crossbeam_channel::bounded(total.max(1));
        let mut handles = Vec::with_capacity(total);

        tracing::debug!(agents = total, ?ticks, "starting agent threads");

        for mut agent in self.agents {
            let id = agent.id();
            let world = Arc::clone(&self.world);
            let delay = self.delay.clone();
            let done_tx = done_tx.clone();
            let handle = thread::Builder::new()
                .name(format!("burrow-agent-{id}"))
                .spawn(move || {
                    agent.run(&world, &delay, ticks);
                    tracing::debug!(agent = %id, "agent finished");
                    // Best-effort: the receiver may already be gone.
                    let _ = done_tx.send(id);
                    agent
                })
                .map_err(|e| RunError::ThreadSpawnFailed {
                    agent: id,
                    reason: e.to_string(),
                })?;
            handles.push(handle);
        }

        Ok(RunningSimulation {
            world: self.world,
            handles,
            done_rx,
        })
    }
}

// ── RunningSimulation ────────────────────────────────────────────

/// Handles to running agent threads.
#[derive(Debug)]
pub struct RunningSimulation {
    world: Arc<World>,
    handles: Vec<JoinHandle<Agent>>,
    done_rx: Receiver<AgentId>,
}

impl RunningSimulation {
    /// The shared world, for rendering or locked inspection while agents run.
    pub fn world(&self) -> &Arc<World> {
        &self.world
    }

    /// Number of agent threads.
    pub fn agent_count(&self) -> usize {
        self.handles.len()
    }

    /// Whether every agent thread has exited. Never true for an unbounded
    /// run unless an agent panicked.
    pub fn is_finished(&self) -> bool {
        self.handles.iter().all(JoinHandle::is_finished)
    }

    /// Publish frames to `sink` every `interval` until `frames` have been
    /// drawn or every agent thread has exited, whichever comes first.
    ///
    /// Returns the number of frames published.
    pub fn render<S: SnapshotSink + ?Sized>(
        &self,
        sink: &mut S,
        interval: Duration,
        frames: Option<u64>,
    ) -> io::Result<u64> {
        run_render_loop_while(&self.world, sink, interval, frames, || !self.is_finished())
    }

    /// Wait for every agent thread and recover the agents.
    ///
    /// Blocks forever if the run was started without a tick limit.
    pub fn join(self) -> Result<Vec<Agent>, RunError> {
        join_all(self.handles)
    }

    /// Like [`join`](Self::join), but give up once `timeout` has elapsed.
    ///
    /// On timeout the remaining threads are detached and keep running.
    pub fn join_within(self, timeout: Duration) -> Result<Vec<Agent>, RunError> {
        let deadline = Instant::now() + timeout;
        let total = self.handles.len();
        let mut finished = 0;
        while finished < total {
            match self.done_rx.recv_deadline(deadline) {
                Ok(_) => finished += 1,
                // Every sender is gone, so every thread has ended. Any that
                // did not report in panicked; join_all reports which.
                Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {
                    tracing::warn!(finished, total, "agents still running at deadline");
                    return Err(RunError::DeadlineExceeded { finished, total });
                }
            }
        }
        join_all(self.handles)
    }
}

fn join_all(handles: Vec<JoinHandle<Agent>>) -> Result<Vec<Agent>, RunError> {
    handles
        .into_iter()
        .enumerate()
        .map(|(i, handle)| {
            handle.join().map_err(|_| {
                let agent = AgentId(i as u32);
                tracing::warn!(%agent, "agent thread panicked");
                RunError::AgentPanicked { agent }
            })
        })
        .collect()
}
