//! Bounded-concurrency chunk scheduling.
//!
//! Jobs are pulled lazily from [`DispatchOrder`] by a dedicated rayon pool
//! sized to the run's concurrency, and each outcome is handed to the
//! consumer through a bounded channel as soon as its job finishes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender, bounded};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::domain::{ChunkResult, FileEntry};
use crate::error::{ChunkFailure, ChunksumError, Result};
use crate::hash::chunk::hash_entry_chunk;
use crate::hash::registry::Algorithm;
use crate::options::{FailurePolicy, RunOptions};

pub type Outcome = std::result::Result<ChunkResult, ChunkFailure>;

/// Stops dispatch of further jobs. Jobs already running finish normally.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Every `(file, chunk)` pair, chunk index major and path minor, so that
/// chunk 0 of every file is read before chunk 1 of any file.
pub struct DispatchOrder {
    live: Vec<Arc<FileEntry>>,
    round: u64,
    cursor: usize,
}

impl DispatchOrder {
    pub fn new(entries: impl IntoIterator<Item = FileEntry>) -> Self {
        let mut live: Vec<Arc<FileEntry>> = entries
            .into_iter()
            .filter(|e| e.chunk_count > 0)
            .map(Arc::new)
            .collect();
        live.sort_by(|a, b| a.path.cmp(&b.path));
        Self {
            live,
            round: 0,
            cursor: 0,
        }
    }
}

impl Iterator for DispatchOrder {
    type Item = (Arc<FileEntry>, u64);

    fn next(&mut self) -> Option<Self::Item> {
        while !self.live.is_empty() {
            if let Some(e) = self.live.get(self.cursor) {
                self.cursor += 1;
                return Some((Arc::clone(e), self.round));
            }
            // round done: files with no chunk left drop out
            self.round += 1;
            self.cursor = 0;
            let round = self.round;
            self.live.retain(|e| e.chunk_count > round);
        }
        None
    }
}

/// Completion-ordered outcomes of a run.
///
/// Dropping the stream cancels dispatch, discards outcomes of jobs still in
/// flight and waits for the pool to wind down.
pub struct ChunkStream {
    rx: Receiver<Outcome>,
    cancel: CancelHandle,
    dispatcher: Option<JoinHandle<()>>,
    total_jobs: u64,
}

impl ChunkStream {
    pub fn canceller(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Number of jobs the run would produce if nothing stops it early.
    pub fn total_jobs(&self) -> u64 {
        self.total_jobs
    }

    fn join_dispatcher(&mut self) {
        if let Some(h) = self.dispatcher.take() {
            if let Err(panic) = h.join() {
                std::panic::resume_unwind(panic);
            }
        }
    }
}

impl Iterator for ChunkStream {
    type Item = Outcome;

    fn next(&mut self) -> Option<Outcome> {
        match self.rx.recv() {
            Ok(outcome) => Some(outcome),
            Err(_) => {
                self.join_dispatcher();
                None
            }
        }
    }
}

impl Drop for ChunkStream {
    fn drop(&mut self) {
        if self.dispatcher.is_none() {
            return;
        }
        self.cancel.cancel();
        // unblock workers waiting on a full channel
        while self.rx.recv().is_ok() {}
        if let Some(h) = self.dispatcher.take() {
            let _ = h.join();
        }
    }
}

/// Start hashing every chunk of `entries`.
///
/// Returns once the pool is running; outcomes arrive through the returned
/// stream in completion order.
pub fn run(entries: Vec<FileEntry>, options: &RunOptions) -> Result<ChunkStream> {
    options.validate()?;
    if let Some(e) = entries.iter().find(|e| e.chunk_size != options.chunk_size) {
        return Err(ChunksumError::InvalidConfiguration(format!(
            "{} was planned with chunk size {}, run uses {}",
            e.path.display(),
            e.chunk_size,
            options.chunk_size
        )));
    }

    let total_jobs: u64 = entries.iter().map(|e| e.chunk_count).sum();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.concurrency)
        .thread_name(|i| format!("chunksum-worker-{i}"))
        .build()
        .map_err(std::io::Error::other)?;

    let (tx, rx) = bounded::<Outcome>(options.concurrency * 2);
    let cancel = CancelHandle::default();
    let worker = Worker {
        algorithm: options.algorithm,
        policy: options.on_failure,
        cancel: cancel.clone(),
    };
    let buffer_size = options.effective_buffer();

    debug!(
        files = entries.len(),
        jobs = total_jobs,
        concurrency = options.concurrency,
        algorithm = %options.algorithm,
        "starting run"
    );

    let stop = cancel.clone();
    let dispatcher = std::thread::Builder::new()
        .name("chunksum-dispatch".into())
        .spawn(move || {
            pool.install(|| {
                DispatchOrder::new(entries)
                    .take_while(|_| !stop.is_cancelled())
                    .par_bridge()
                    .for_each_init(
                        || (tx.clone(), vec![0u8; buffer_size]),
                        |(tx, buf), (entry, chunk_index)| {
                            worker.process(tx, buf, &entry, chunk_index);
                        },
                    );
            });
        })?;

    Ok(ChunkStream {
        rx,
        cancel,
        dispatcher: Some(dispatcher),
        total_jobs,
    })
}

struct Worker {
    algorithm: Algorithm,
    policy: FailurePolicy,
    cancel: CancelHandle,
}

impl Worker {
    fn process(&self, tx: &Sender<Outcome>, buf: &mut [u8], entry: &FileEntry, chunk_index: u64) {
        let outcome = hash_entry_chunk(self.algorithm, entry, chunk_index, buf).map_err(|error| {
            if self.policy == FailurePolicy::Drain && !self.cancel.is_cancelled() {
                warn!(
                    path = %entry.path.display(),
                    chunk = chunk_index,
                    "chunk failed, no further jobs will be dispatched"
                );
                self.cancel.cancel();
            }
            ChunkFailure {
                job: entry.job(chunk_index),
                error,
            }
        });
        if tx.send(outcome).is_err() {
            // consumer is gone
            self.cancel.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn order(entries: Vec<FileEntry>) -> Vec<(PathBuf, u64)> {
        DispatchOrder::new(entries)
            .map(|(e, i)| (e.path.clone(), i))
            .collect()
    }

    #[test]
    fn dispatch_groups_chunk_indices_across_files() {
        let got = order(vec![
            FileEntry::new("b", 9, 4),
            FileEntry::new("a", 4, 4),
            FileEntry::new("c", 0, 4),
            FileEntry::new("d", 8, 4),
        ]);
        let want: Vec<(PathBuf, u64)> = [
            ("a", 0),
            ("b", 0),
            ("d", 0),
            ("b", 1),
            ("d", 1),
            ("b", 2),
        ]
        .into_iter()
        .map(|(p, i)| (PathBuf::from(p), i))
        .collect();
        assert_eq!(got, want);
    }

    #[test]
    fn dispatch_yields_each_job_once() {
        let entries: Vec<FileEntry> = (0..7u64)
            .map(|i| FileEntry::new(format!("f{i}"), i * 5 + 1, 3))
            .collect();
        let expected: u64 = entries.iter().map(|e| e.chunk_count).sum();
        let mut got = order(entries);
        assert_eq!(got.len() as u64, expected);
        got.sort();
        got.dedup();
        assert_eq!(got.len() as u64, expected);
    }

    #[test]
    fn empty_input_set() {
        assert!(order(Vec::new()).is_empty());
        let stream = run(Vec::new(), &RunOptions::default()).unwrap();
        assert_eq!(stream.total_jobs(), 0);
        assert_eq!(stream.count(), 0);
    }

    #[test]
    fn chunk_size_mismatch_rejected() {
        let opts = RunOptions {
            chunk_size: 8,
            ..Default::default()
        };
        let err = run(vec![FileEntry::new("x", 10, 4)], &opts).err().unwrap();
        assert!(matches!(err, ChunksumError::InvalidConfiguration(_)));
    }

    #[test]
    fn zero_concurrency_rejected() {
        let opts = RunOptions {
            concurrency: 0,
            ..Default::default()
        };
        assert!(matches!(
            run(Vec::new(), &opts),
            Err(ChunksumError::InvalidConfiguration(_))
        ));
    }
}
