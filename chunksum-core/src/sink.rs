//! Rendering of chunk results as they arrive.

use std::borrow::Cow;
use std::collections::HashSet;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use serde::Serialize;
use tracing::{error, info};

use crate::domain::ChunkResult;
use crate::error::{ChunksumError, Result};
use crate::schedule::Outcome;
use crate::stats::RunStats;

pub trait Sink {
    /// Write one result and flush it.
    fn emit(&mut self, result: &ChunkResult) -> io::Result<()>;
}

/// `<digest-hex> <path>#<chunk> 0x<length-hex>+<offset-hex>`
pub fn format_line(r: &ChunkResult) -> String {
    format!(
        "{} {}#{} 0x{:x}+{:x}",
        r.digest_hex(),
        r.path.display(),
        r.chunk_index,
        r.length,
        r.offset
    )
}

pub struct LineSink<W: Write> {
    inner: W,
}

impl<W: Write> LineSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Sink for LineSink<W> {
    fn emit(&mut self, result: &ChunkResult) -> io::Result<()> {
        writeln!(self.inner, "{}", format_line(result))?;
        self.inner.flush()
    }
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    digest: String,
    // lossy, like `LineSink`: a non-UTF-8 name must not abort the run
    path: Cow<'a, str>,
    chunk: u64,
    offset: u64,
    length: u64,
}

/// One JSON object per line.
pub struct JsonSink<W: Write> {
    inner: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Sink for JsonSink<W> {
    fn emit(&mut self, r: &ChunkResult) -> io::Result<()> {
        let rec = JsonRecord {
            digest: r.digest_hex(),
            path: r.path.to_string_lossy(),
            chunk: r.chunk_index,
            offset: r.offset,
            length: r.length,
        };
        serde_json::to_writer(&mut self.inner, &rec)?;
        self.inner.write_all(b"\n")?;
        self.inner.flush()
    }
}

/// Render every successful outcome in arrival order.
///
/// Failures are logged as they arrive; once the stream is exhausted the
/// first one is returned. Lines already written stay valid.
pub fn drain<S: Sink + ?Sized>(
    outcomes: impl IntoIterator<Item = Outcome>,
    sink: &mut S,
) -> Result<RunStats> {
    let mut stats = RunStats::default();
    drain_into(outcomes, sink, &mut stats)?;
    Ok(stats)
}

/// Like [`drain`], but `stats` is filled in on the failure path too.
pub fn drain_into<S: Sink + ?Sized>(
    outcomes: impl IntoIterator<Item = Outcome>,
    sink: &mut S,
    stats: &mut RunStats,
) -> Result<()> {
    let started = Instant::now();
    let mut files: HashSet<PathBuf> = HashSet::new();
    let mut first_failure: Option<ChunksumError> = None;

    for outcome in outcomes {
        match outcome {
            Ok(r) => {
                info!("hash({}#{}) = {}", r.path.display(), r.chunk_index, r.digest_hex());
                if let Err(e) = sink.emit(&r) {
                    // output is gone; dropping the stream cancels the run
                    first_failure = Some(e.into());
                    break;
                }
                stats.chunks += 1;
                stats.bytes += r.length;
                files.insert(r.path);
            }
            Err(failure) => {
                error!("{failure}");
                stats.failures += 1;
                if first_failure.is_none() {
                    first_failure = Some(failure.into());
                }
            }
        }
    }

    stats.files = files.len() as u64;
    stats.elapsed_ms = started.elapsed().as_millis() as u64;
    match first_failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
