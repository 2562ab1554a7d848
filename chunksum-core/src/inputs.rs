use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::FileEntry;
use crate::error::{ChunksumError, Result};

impl FileEntry {
    /// Size a regular file once; the size is not re-checked per chunk.
    pub fn stat(path: &Path, chunk_size: u64) -> Result<Self> {
        let not_found = |source| ChunksumError::InputNotFound {
            path: path.to_path_buf(),
            source,
        };
        let md = std::fs::metadata(path).map_err(not_found)?;
        if !md.is_file() {
            return Err(not_found(io::Error::new(
                io::ErrorKind::InvalidInput,
                "not a regular file",
            )));
        }
        Ok(FileEntry::new(path, md.len(), chunk_size))
    }
}

/// Size every input before any job runs. The first input that cannot be
/// sized aborts the whole plan. Repeated paths are planned once.
pub fn plan_inputs<P: AsRef<Path>>(paths: &[P], chunk_size: u64) -> Result<Vec<FileEntry>> {
    if chunk_size == 0 {
        return Err(ChunksumError::InvalidConfiguration(
            "chunk size must be at least 1 byte".into(),
        ));
    }
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut entries = Vec::with_capacity(paths.len());
    for p in paths {
        let p = p.as_ref();
        if !seen.insert(p.to_path_buf()) {
            continue;
        }
        let entry = FileEntry::stat(p, chunk_size)?;
        debug!(
            path = %entry.path.display(),
            size = entry.size,
            chunks = entry.chunk_count,
            "planned input"
        );
        entries.push(entry);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plans_sizes_and_chunk_counts() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        std::fs::write(&a, vec![1u8; 10]).unwrap();
        std::fs::write(&b, b"").unwrap();

        let entries = plan_inputs(&[&a, &b, &a], 4).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], FileEntry::new(&a, 10, 4));
        assert_eq!(entries[0].chunk_count, 3);
        assert_eq!(entries[1].chunk_count, 0);
    }

    #[test]
    fn missing_input_aborts_plan() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        std::fs::write(&a, b"data").unwrap();
        let missing = dir.path().join("missing");

        let err = plan_inputs(&[&a, &missing], 4).unwrap_err();
        match err {
            ChunksumError::InputNotFound { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn directory_is_not_an_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = plan_inputs(&[dir.path()], 4).unwrap_err();
        assert!(matches!(err, ChunksumError::InputNotFound { .. }));
    }
}
