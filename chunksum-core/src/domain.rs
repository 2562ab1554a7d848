// chunksum_core/src/domain.rs
use std::path::PathBuf;

use crate::error::Result;
use crate::plan::{ChunkRange, chunk_count, chunk_range};

/// One input file, sized once at plan time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub size: u64,
    pub chunk_size: u64,
    pub chunk_count: u64,
}

impl FileEntry {
    /// `chunk_size` must be at least 1.
    pub fn new(path: impl Into<PathBuf>, size: u64, chunk_size: u64) -> Self {
        Self {
            path: path.into(),
            size,
            chunk_size,
            chunk_count: chunk_count(size, chunk_size),
        }
    }

    pub fn range_of(&self, chunk_index: u64) -> Result<ChunkRange> {
        chunk_range(self.size, self.chunk_size, chunk_index)
    }

    pub fn job(&self, chunk_index: u64) -> ChunkJob {
        ChunkJob {
            path: self.path.clone(),
            chunk_index,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChunkJob {
    pub path: PathBuf,
    pub chunk_index: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkResult {
    pub path: PathBuf,
    pub chunk_index: u64,
    pub digest: Vec<u8>,
    pub offset: u64,
    pub length: u64,
}

impl ChunkResult {
    pub fn digest_hex(&self) -> String {
        hex::encode(&self.digest)
    }
}
