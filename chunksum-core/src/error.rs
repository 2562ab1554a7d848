use std::path::PathBuf;

use thiserror::Error;

use crate::domain::ChunkJob;

#[derive(Error, Debug)]
pub enum ChunksumError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("input not found: {}: {source}", path.display())]
    InputNotFound {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(
        "short read: {} at offset {offset}: expected {expected} bytes, got {got}",
        path.display()
    )]
    ShortRead {
        path: PathBuf,
        offset: u64,
        expected: u64,
        got: u64,
    },

    /// Chunk index outside `[0, chunk_count)`. Only a broken job enumeration
    /// can produce this.
    #[error("chunk {index} out of range (file size {file_size}, chunk size {chunk_size})")]
    OutOfRange {
        index: u64,
        file_size: u64,
        chunk_size: u64,
    },

    #[error(transparent)]
    Job(Box<ChunkFailure>),
}

impl From<ChunkFailure> for ChunksumError {
    fn from(f: ChunkFailure) -> Self {
        ChunksumError::Job(Box::new(f))
    }
}

impl ChunksumError {
    /// True for internal invariant violations, as opposed to operational
    /// failures caused by the environment or the caller's input.
    pub fn is_defect(&self) -> bool {
        match self {
            ChunksumError::OutOfRange { .. } => true,
            ChunksumError::Job(f) => f.error.is_defect(),
            _ => false,
        }
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, ChunksumError>;

/// A failed chunk job, tagged with the job it belongs to.
#[derive(Error, Debug)]
#[error("{}#{}: {error}", job.path.display(), job.chunk_index)]
pub struct ChunkFailure {
    pub job: ChunkJob,
    #[source]
    pub error: ChunksumError,
}
