//! Many agents on real threads: exclusivity, deadlock freedom, rendering.
//!
//! Every run here is bounded by a tick count and guarded by an overall
//! deadline, so a deadlock shows up as a failure rather than a hang.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use burrow_core::Cell;
use burrow_engine::render::run_render_loop;
use burrow_engine::{
    ChannelSink, MoveOutcome, Placement, Protocol, RunError, Simulation, World, WorldConfig,
};
use burrow_test_utils::{
    assert_no_collisions, drive_concurrently, fast_delay, seeded_world, DEADLINE,
};
use proptest::prelude::*;

// ── Two agents, one column ──────────────────────────────────────

#[test]
fn two_agents_in_one_by_two_never_share_a_cell() {
    // Both start stacked on (0, 0). The first attempt to finish is always
    // a commit, after which the column is full and both are pinned.
    let (world, agents) = seeded_world(1, 2, 2, Placement::Origin, 2024);
    let world = Arc::new(world);
    let agents = drive_concurrently(&world, agents, 10_000, DEADLINE, |world, _| {
        let p = world.locked_positions();
        assert_ne!(p[0], p[1], "agents collided at {}", p[0]);
    });
    assert_eq!(agents.len(), 2);

    let mut final_positions = world.locked_positions();
    final_positions.sort();
    assert_eq!(final_positions, vec![Cell::new(0, 0), Cell::new(0, 1)]);
    let stats = world.move_stats();
    assert_eq!(stats.attempts, 20_000);
    assert_eq!(stats.moved, 1);
    assert_eq!(stats.blocked, 19_999);
}

// ── Exclusivity under load ──────────────────────────────────────

#[test]
fn dense_grid_stays_collision_free() {
    let (world, agents) = seeded_world(4, 4, 12, Placement::Distinct, 7);
    let world = Arc::new(world);
    let checks = Arc::new(AtomicU64::new(0));
    let counted = Arc::clone(&checks);
    drive_concurrently(&world, agents, 2_000, DEADLINE, move |world, _| {
        assert_no_collisions(world, &world.locked_positions());
        counted.fetch_add(1, Ordering::Relaxed);
    });
    assert_eq!(checks.load(Ordering::Relaxed), 24_000);
    assert_no_collisions(&world, &world.locked_positions());
    assert!(world.move_stats().moved > 0);
}

#[test]
fn full_grid_blocks_every_move_without_deadlock() {
    let (world, agents) = seeded_world(3, 3, 9, Placement::Distinct, 0);
    let world = Arc::new(world);
    let before = world.positions();
    drive_concurrently(&world, agents, 1_000, DEADLINE, |_, outcome| {
        assert!(matches!(outcome, MoveOutcome::Blocked { .. }));
    });
    assert_eq!(world.positions(), before);
}

#[test]
fn origin_stack_is_the_only_shared_cell() {
    let (world, agents) = seeded_world(5, 5, 6, Placement::Origin, 31);
    let world = Arc::new(world);
    drive_concurrently(&world, agents, 1_000, DEADLINE, |world, _| {
        let positions = world.locked_positions();
        for (i, a) in positions.iter().enumerate() {
            for b in &positions[i + 1..] {
                assert!(a != b || *a == Cell::ORIGIN, "agents share {a}");
            }
        }
    });
}

#[test]
fn global_protocol_is_also_exclusive() {
    let mut world = World::with_protocol(3, 3, Protocol::Global).unwrap();
    let agents = world.spawn_with(6, Placement::Distinct, 5).unwrap();
    let world = Arc::new(world);
    drive_concurrently(&world, agents, 2_000, DEADLINE, |world, _| {
        assert_no_collisions(world, &world.locked_positions());
    });
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn no_collision_for_any_grid_and_population(
        width in 1u32..6,
        height in 1u32..6,
        fill in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let cells = (width * height) as usize;
        let agents = ((cells as f64 * fill) as usize).clamp(1, cells);
        let (world, spawned) = seeded_world(width, height, agents, Placement::Distinct, seed);
        let world = Arc::new(world);
        drive_concurrently(&world, spawned, 300, DEADLINE, |world, _| {
            assert_no_collisions(world, &world.locked_positions());
        });
        let stats = world.move_stats();
        prop_assert_eq!(stats.attempts, 300 * agents as u64);
        prop_assert_eq!(stats.attempts, stats.moved + stats.blocked + stats.stuck);
    }
}

// ── Deadlock freedom through the real run loop ──────────────────

#[test]
fn bounded_runs_always_finish() {
    let shapes = [(2, 1, 2), (1, 2, 2), (3, 3, 8), (4, 4, 16), (8, 2, 5), (10, 10, 40)];
    for (width, height, agents) in shapes {
        for protocol in [Protocol::OrderedPair, Protocol::Global] {
            let sim = Simulation::new(WorldConfig {
                width,
                height,
                agents,
                placement: Placement::Distinct,
                protocol,
                delay: fast_delay(),
                seed: 42,
            })
            .unwrap();
            let running = sim.start(Some(500)).unwrap();
            let world = Arc::clone(running.world());
            let joined = running.join_within(DEADLINE);
            assert!(joined.is_ok(), "{width}x{height} with {agents} agents: {joined:?}");
            assert_no_collisions(&world, &world.locked_positions());
        }
    }
}

#[test]
fn stacked_start_runs_finish_too() {
    let sim = Simulation::new(WorldConfig {
        width: 3,
        height: 2,
        agents: 10,
        delay: fast_delay(),
        ..WorldConfig::default()
    })
    .unwrap();
    let running = sim.start(Some(300)).unwrap();
    let agents = running.join_within(DEADLINE).unwrap();
    assert_eq!(agents.len(), 10);
}

// ── Rendering alongside movers ──────────────────────────────────

#[test]
fn frames_keep_their_shape_while_agents_move() {
    let sim = Simulation::new(WorldConfig {
        width: 6,
        height: 4,
        agents: 5,
        placement: Placement::Distinct,
        delay: fast_delay(),
        ..WorldConfig::default()
    })
    .unwrap();
    let running = sim.start(Some(2_000)).unwrap();
    let (tx, rx) = crossbeam_channel::unbounded();
    let mut sink = ChannelSink::new(tx);
    let frames = run_render_loop(running.world(), &mut sink, Duration::from_micros(50), Some(100))
        .unwrap();
    assert_eq!(frames, 100);
    running.join_within(DEADLINE).unwrap();

    for frame in rx.try_iter() {
        let rows: Vec<&str> = frame.lines().collect();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.chars().count() == 6));
        let glyphs = frame.chars().filter(|&ch| ch != '_' && ch != '\n').count();
        assert!(glyphs <= 5, "frame shows {glyphs} agents:\n{frame}");
    }
}

#[test]
fn join_within_reports_stuck_runs() {
    let sim = Simulation::new(WorldConfig {
        width: 2,
        height: 2,
        agents: 2,
        delay: fast_delay(),
        ..WorldConfig::default()
    })
    .unwrap();
    let running = sim.start(None).unwrap();
    assert!(matches!(
        running.join_within(Duration::from_millis(20)),
        Err(RunError::DeadlineExceeded { total: 2, .. })
    ));
}
