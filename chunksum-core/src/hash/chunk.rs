use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::debug;

use super::registry::Algorithm;
use crate::domain::{ChunkResult, FileEntry};
use crate::error::{ChunksumError, Result};

/// Digest `length` bytes of `path` starting at `offset`.
///
/// Reads go straight to the file (no userspace buffering) in increments of
/// at most `buf.len()` bytes, so a chunk is never held in memory whole. Each
/// call opens its own handle; concurrent calls on one file are independent.
pub fn hash_chunk(
    algorithm: Algorithm,
    path: &Path,
    offset: u64,
    length: u64,
    buf: &mut [u8],
) -> Result<Vec<u8>> {
    if buf.is_empty() {
        return Err(ChunksumError::InvalidConfiguration(
            "read buffer must not be empty".into(),
        ));
    }
    let mut f = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ChunksumError::InputNotFound {
            path: path.to_path_buf(),
            source: e,
        },
        _ => ChunksumError::Io(e),
    })?;
    f.seek(SeekFrom::Start(offset))?;

    let mut acc = algorithm.accumulator();
    let mut count = 0u64;
    while count < length {
        let want = buf.len().min((length - count).try_into().unwrap_or(usize::MAX));
        let n = match f.read(&mut buf[..want]) {
            Ok(0) => {
                return Err(ChunksumError::ShortRead {
                    path: path.to_path_buf(),
                    offset,
                    expected: length,
                    got: count,
                });
            }
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        acc.update(&buf[..n]);
        count += n as u64;
    }
    Ok(acc.finalize())
}

/// Hash one chunk of a planned file.
pub fn hash_entry_chunk(
    algorithm: Algorithm,
    entry: &FileEntry,
    chunk_index: u64,
    buf: &mut [u8],
) -> Result<ChunkResult> {
    let range = entry.range_of(chunk_index)?;
    debug!(
        path = %entry.path.display(),
        chunk = chunk_index,
        offset = range.offset,
        length = range.length,
        "hashing chunk"
    );
    let digest = hash_chunk(algorithm, &entry.path, range.offset, range.length, buf)?;
    Ok(ChunkResult {
        path: entry.path.clone(),
        chunk_index,
        digest,
        offset: range.offset,
        length: range.length,
    })
}
