#![forbid(unsafe_code)]

pub mod error;
pub mod options;
pub mod size;

pub mod domain;
pub mod inputs;
pub mod plan;

pub mod hash {
    pub mod chunk;
    pub mod registry;
}

pub mod schedule;
pub mod sink;
pub mod stats;

// Re-exports: stable API surface
pub use domain::{ChunkJob, ChunkResult, FileEntry};
pub use error::{ChunkFailure, ChunksumError, Result};
pub use hash::chunk::{hash_chunk, hash_entry_chunk};
pub use hash::registry::{Accumulator, Algorithm};
pub use inputs::plan_inputs;
pub use options::{FailurePolicy, RunOptions};
pub use schedule::{CancelHandle, ChunkStream, Outcome, run};
pub use sink::{JsonSink, LineSink, Sink, drain, drain_into, format_line};
pub use stats::RunStats;
