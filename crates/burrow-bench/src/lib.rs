//! Benchmark profiles for Burrow.
//!
//! - [`reference_profile`]: 100x100 grid with 1000 spread-out worms
//! - [`crowded_profile`]: 16x16 grid with every other cell occupied
//! - [`populated_world`]: a world built from a profile, ready to step

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::time::Duration;

use burrow_engine::{Agent, DelayConfig, Placement, Protocol, World, WorldConfig};

/// 100x100 grid (10K cells), 1000 agents placed in distinct cells.
pub fn reference_profile(seed: u64) -> WorldConfig {
    WorldConfig {
        width: 100,
        height: 100,
        agents: 1000,
        placement: Placement::Distinct,
        protocol: Protocol::OrderedPair,
        delay: DelayConfig::fixed(Duration::from_micros(1)),
        seed,
    }
}

/// 16x16 grid at half occupancy, so a large share of moves are blocked.
pub fn crowded_profile(seed: u64) -> WorldConfig {
    WorldConfig {
        width: 16,
        height: 16,
        agents: 128,
        ..reference_profile(seed)
    }
}

/// Build the world described by `config` and spawn its agents.
///
/// # Panics
///
/// Panics if `config` is invalid; the profiles above never are.
pub fn populated_world(config: &WorldConfig) -> (World, Vec<Agent>) {
    config.validate().expect("benchmark profile must be valid");
    let mut world = World::with_protocol(config.width, config.height, config.protocol)
        .expect("benchmark grid must be valid");
    let agents = world
        .spawn_with(config.agents, config.placement, config.seed)
        .expect("benchmark population must fit");
    (world, agents)
}
