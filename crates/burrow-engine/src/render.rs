//! Text snapshots of occupancy and the sinks that consume them.
//!
//! Rendering never takes a cell lock. Each frame reads every agent position
//! once, so a frame can be momentarily stale (an agent mid-move may appear
//! in its old cell) but corrects itself on the next frame. Terminal control
//! is left to whatever [`SnapshotSink`] the caller plugs in.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use burrow_core::AgentId;
use crossbeam_channel::Sender;

use crate::world::World;

/// Character drawn for an empty cell.
pub const FILLER: char = '_';

/// Display glyph for an agent: one of the 93 printable ASCII characters
/// from `!` onward, cycling by id.
pub fn glyph_for(id: AgentId) -> char {
    char::from(33 + (id.0 % 93) as u8)
}

/// Render `world` row by row: one glyph or [`FILLER`] per cell, a newline
/// after every row.
///
/// Where agents share a cell the lowest id is drawn, matching
/// [`World::occupant_at`].
pub fn render(world: &World) -> String {
    let grid = world.grid();
    let mut occupancy: Vec<Option<AgentId>> = vec![None; grid.cell_count()];
    for (i, cell) in world.positions().into_iter().enumerate() {
        if let Some(rank) = grid.canonical_rank(cell) {
            occupancy[rank].get_or_insert(AgentId(i as u32));
        }
    }

    let width = grid.width() as usize;
    let mut out = String::with_capacity((width + 1) * grid.height() as usize);
    for row in occupancy.chunks(width) {
        out.extend(row.iter().map(|slot| slot.map_or(FILLER, glyph_for)));
        out.push('\n');
    }
    out
}

/// Anything that accepts rendered frames.
pub trait SnapshotSink {
    /// Consume one frame.
    fn publish(&mut self, frame: &str) -> io::Result<()>;
}

/// Forwards frames over a crossbeam channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<String>,
}

impl ChannelSink {
    /// Wrap the sending half of a channel.
    pub fn new(tx: Sender<String>) -> Self {
        Self { tx }
    }
}

impl SnapshotSink for ChannelSink {
    fn publish(&mut self, frame: &str) -> io::Result<()> {
        self.tx
            .send(frame.to_owned())
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "frame receiver dropped"))
    }
}

/// Writes frames verbatim to any [`Write`] and flushes after each.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    inner: W,
}

impl<W: Write> WriterSink<W> {
    /// Wrap a writer.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> SnapshotSink for WriterSink<W> {
    fn publish(&mut self, frame: &str) -> io::Result<()> {
        self.inner.write_all(frame.as_bytes())?;
        self.inner.flush()
    }
}

/// Poll `world` every `interval` and publish each frame to `sink`.
///
/// Runs forever when `frames` is `None`; otherwise stops after that many
/// frames. Returns the number of frames published, or the first sink error.
pub fn run_render_loop<S: SnapshotSink + ?Sized>(
    world: &World,
    sink: &mut S,
    interval: Duration,
    frames: Option<u64>,
) -> io::Result<u64> {
    run_render_loop_while(world, sink, interval, frames, || true)
}

/// Like [`run_render_loop`], but also stops as soon as `keep_going`
/// returns `false`. It is checked before every frame.
pub fn run_render_loop_while<S, F>(
    world: &World,
    sink: &mut S,
    interval: Duration,
    frames: Option<u64>,
    mut keep_going: F,
) -> io::Result<u64>
where
    S: SnapshotSink + ?Sized,
    F: FnMut() -> bool,
{
    let mut published = 0u64;
    while frames.is_none_or(|limit| published < limit) && keep_going() {
        sink.publish(&world.snapshot())?;
        published += 1;
        thread::sleep(interval);
    }
    Ok(published)
}
