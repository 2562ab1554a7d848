use crate::error::{ChunksumError, Result};
use crate::hash::registry::Algorithm;

/// What the scheduler does once a job has failed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop dispatching new jobs; in-flight jobs finish and are reported.
    #[default]
    Drain,
    /// Keep dispatching; every failure is reported against its job.
    KeepGoing,
}

#[derive(Clone, Debug)]
pub struct RunOptions {
    pub algorithm: Algorithm,
    /// Fixed partition size shared by every file in the run.
    pub chunk_size: u64,
    /// Number of simultaneously active chunk jobs.
    pub concurrency: usize,
    /// Read increment per worker; each worker owns one buffer of this size.
    pub buffer_size: usize,
    pub on_failure: FailurePolicy,
}

pub const DEFAULT_CHUNK_SIZE: u64 = 4 << 30;
pub const DEFAULT_CONCURRENCY: usize = 4;
pub const DEFAULT_BUFFER_SIZE: usize = 32 * 1024 * 1024;

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Sha1,
            chunk_size: DEFAULT_CHUNK_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
            buffer_size: DEFAULT_BUFFER_SIZE,
            on_failure: FailurePolicy::Drain,
        }
    }
}

impl RunOptions {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(ChunksumError::InvalidConfiguration(
                "chunk size must be at least 1 byte".into(),
            ));
        }
        if self.concurrency == 0 {
            return Err(ChunksumError::InvalidConfiguration(
                "concurrency must be at least 1".into(),
            ));
        }
        if self.buffer_size == 0 {
            return Err(ChunksumError::InvalidConfiguration(
                "read buffer must be at least 1 byte".into(),
            ));
        }
        Ok(())
    }

    /// Buffer actually allocated per worker: never larger than one chunk.
    pub(crate) fn effective_buffer(&self) -> usize {
        usize::try_from(self.chunk_size)
            .map(|c| c.min(self.buffer_size))
            .unwrap_or(self.buffer_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let o = RunOptions::default();
        assert!(o.validate().is_ok());
        assert_eq!(o.on_failure, FailurePolicy::Drain);
        assert_eq!(o.algorithm, Algorithm::Sha1);
    }

    #[test]
    fn zero_values_rejected() {
        let bad = [
            RunOptions { chunk_size: 0, ..Default::default() },
            RunOptions { concurrency: 0, ..Default::default() },
            RunOptions { buffer_size: 0, ..Default::default() },
        ];
        for o in bad {
            assert!(matches!(
                o.validate(),
                Err(ChunksumError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn buffer_capped_at_chunk_size() {
        let o = RunOptions { chunk_size: 4, ..Default::default() };
        assert_eq!(o.effective_buffer(), 4);
        assert_eq!(RunOptions::default().effective_buffer(), DEFAULT_BUFFER_SIZE);
    }
}
