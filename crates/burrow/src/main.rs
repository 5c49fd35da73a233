//! `burrow`: watch worms wander a grid in the terminal.
//!
//! ```text
//! burrow <WIDTH> <HEIGHT> <AGENTS> [--seed N] [--frames N] [--ticks N] ...
//! ```
//!
//! Frames go to stdout, redrawn in place; logs go to stderr (`RUST_LOG`).

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use burrow::prelude::*;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "burrow", version, about = "Concurrent worms on a bounded grid")]
struct Cli {
    /// Grid width in cells.
    width: u32,
    /// Grid height in cells.
    height: u32,
    /// Number of worms.
    agents: usize,
    /// Base RNG seed; worm i uses stream i.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Where worms start.
    #[arg(long, value_enum, default_value_t = CliPlacement::Origin)]
    placement: CliPlacement,
    /// Move synchronisation protocol.
    #[arg(long, value_enum, default_value_t = CliProtocol::Ordered)]
    protocol: CliProtocol,
    /// Shortest pause between a worm's moves, in milliseconds.
    #[arg(long, default_value_t = 3)]
    min_delay_ms: u64,
    /// Longest pause between a worm's moves, in milliseconds.
    #[arg(long, default_value_t = 297)]
    max_delay_ms: u64,
    /// Pause between frames, in milliseconds.
    #[arg(long, default_value_t = 30)]
    frame_ms: u64,
    /// Stop after this many frames (default: never).
    #[arg(long)]
    frames: Option<u64>,
    /// Each worm stops after this many moves (default: never).
    #[arg(long)]
    ticks: Option<u64>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliPlacement {
    Origin,
    Distinct,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliProtocol {
    Ordered,
    Global,
}

impl Cli {
    fn world_config(&self) -> WorldConfig {
        WorldConfig {
            width: self.width,
            height: self.height,
            agents: self.agents,
            placement: match self.placement {
                CliPlacement::Origin => Placement::Origin,
                CliPlacement::Distinct => Placement::Distinct,
            },
            protocol: match self.protocol {
                CliProtocol::Ordered => Protocol::OrderedPair,
                CliProtocol::Global => Protocol::Global,
            },
            delay: DelayConfig {
                min: Duration::from_millis(self.min_delay_ms),
                max: Duration::from_millis(self.max_delay_ms),
            },
            seed: self.seed,
        }
    }
}

/// Redraws each frame over the previous one by moving the cursor up.
struct TerminalSink<W: Write> {
    out: W,
    rows: u32,
    drawn: bool,
}

impl<W: Write> TerminalSink<W> {
    fn new(out: W, rows: u32) -> Self {
        Self {
            out,
            rows,
            drawn: false,
        }
    }
}

impl<W: Write> SnapshotSink for TerminalSink<W> {
    fn publish(&mut self, frame: &str) -> io::Result<()> {
        if self.drawn {
            write!(self.out, "\x1b[{}A", self.rows)?;
        }
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;
        self.drawn = true;
        Ok(())
    }
}

/// What a finished run drew and did.
struct Report<W> {
    frames: u64,
    stats: MoveStats,
    out: W,
}

/// Build and start the simulation described by `cli`, drawing frames to
/// `out`.
///
/// Stops drawing after `--frames` frames, or once every worm has used up
/// its `--ticks`. Bounded runs are joined and their final state drawn.
fn run<W: Write>(cli: &Cli, out: W) -> anyhow::Result<Report<W>> {
    let sim = Simulation::new(cli.world_config()).context("invalid configuration")?;
    let (width, height) = sim.world().dimensions();
    info!(
        width,
        height,
        agents = sim.agents().len(),
        seed = cli.seed,
        protocol = ?sim.world().protocol(),
        "starting simulation"
    );

    let running = sim.start(cli.ticks).context("failed to start worms")?;
    let world = Arc::clone(running.world());
    let mut sink = TerminalSink::new(out, height);
    let mut frames = running
        .render(&mut sink, Duration::from_millis(cli.frame_ms), cli.frames)
        .context("failed to draw frame")?;

    if cli.ticks.is_some() {
        running.join().context("worm thread failed")?;
        sink.publish(&world.snapshot()).context("failed to draw frame")?;
        frames += 1;
    }

    let stats = world.move_stats();
    info!(
        frames,
        attempts = stats.attempts,
        moved = stats.moved,
        blocked = stats.blocked,
        stuck = stats.stuck,
        "done"
    );
    Ok(Report {
        frames,
        stats,
        out: sink.out,
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    run(&cli, io::stdout().lock())?;
    Ok(())
}
