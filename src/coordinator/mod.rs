//! Submission, deduplication and blocking retrieval of digest jobs.
//!
//! The [`Coordinator`] owns the [`JobTable`], the [`DedupIndex`] and the
//! [`StatsAccumulator`] behind a single mutex, so "job exists" and "stats
//! updated" are never observed apart. A [`Notify`] paired with that mutex
//! acts as the broadcast signal: each background task calls
//! `notify_waiters` after publishing, and every blocked [`Coordinator::retrieve`]
//! wakes and re-checks its own job.
//!
//! # Lost wakeups
//!
//! A waiter creates and enables its `Notified` future *before* taking the
//! lock to check its job. A publish that lands between the check and the
//! `.await` is still delivered to that future.

pub mod dedup;
pub mod job;
pub mod stats;
pub mod table;

use std::sync::Arc;

use tokio::sync::{Mutex, Notify};
use tokio::time::Instant;

use crate::config::WorkerConfig;
use crate::error::{HasherError, Result};
use crate::worker::DigestExecutor;

pub use dedup::DedupIndex;
pub use job::{Job, JobId, JobStatus};
pub use stats::{Stats, StatsAccumulator, StatsReport};
pub use table::JobTable;

/// State guarded by the coordinator lock.
#[derive(Debug, Default)]
struct CoordinatorState {
    jobs: JobTable,
    dedup: DedupIndex,
    stats: StatsAccumulator,
}

#[derive(Debug, Default)]
struct Shared {
    state: Mutex<CoordinatorState>,
    ready: Notify,
}

/// Cheap to clone; clones share the same job table.
#[derive(Debug, Clone)]
pub struct Coordinator {
    shared: Arc<Shared>,
    executor: DigestExecutor,
}

impl Coordinator {
    pub fn new(config: &WorkerConfig) -> Self {
        Self {
            shared: Arc::new(Shared::default()),
            executor: DigestExecutor::new(config),
        }
    }

    /// Accept `input` and return its id.
    ///
    /// A never-seen input gets the next sequential id and a background
    /// digest task; a repeated input gets its original id and no new task.
    /// Either way the call is counted in the statistics.
    ///
    /// # Errors
    ///
    /// [`HasherError::EmptyInput`] if `input` is empty. Nothing is recorded.
    pub async fn submit(&self, input: &str) -> Result<JobId> {
        let started = Instant::now();
        if input.is_empty() {
            return Err(HasherError::EmptyInput);
        }

        let (id, created) = {
            let mut state = self.shared.state.lock().await;
            let (id, created) = match state.dedup.get(input) {
                Some(id) => (id, false),
                None => {
                    let id = state.jobs.push_pending();
                    state.dedup.insert(input.to_string(), id);
                    (id, true)
                }
            };
            state.stats.record_submission(started.elapsed());
            (id, created)
        };

        if created {
            tracing::info!(job_id = %id, "Job accepted");
            self.dispatch(id, input.to_string());
        } else {
            tracing::debug!(job_id = %id, "Duplicate submission, reusing job");
        }
        Ok(id)
    }

    /// Parse a client-supplied id and [`retrieve`](Self::retrieve) it.
    ///
    /// # Errors
    ///
    /// [`HasherError::InvalidIdFormat`], [`HasherError::IdNotPositive`] or
    /// [`HasherError::IdOutOfRange`].
    pub async fn lookup(&self, raw_id: &str) -> Result<String> {
        let id: JobId = raw_id.parse()?;
        self.retrieve(id).await
    }

    /// Wait until the digest for `id` is published and return it.
    ///
    /// There is no deadline; callers needing one should wrap this in
    /// `tokio::time::timeout`.
    ///
    /// # Errors
    ///
    /// [`HasherError::IdOutOfRange`] if no job with `id` was ever created.
    /// This is checked before waiting and never blocks.
    pub async fn retrieve(&self, id: JobId) -> Result<String> {
        loop {
            let notified = self.shared.ready.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let state = self.shared.state.lock().await;
                if let Some(digest) = state.jobs.digest(id)? {
                    return Ok(digest.to_string());
                }
            }

            notified.await;
        }
    }

    pub async fn stats(&self) -> Stats {
        self.shared.state.lock().await.stats.snapshot()
    }

    /// Number of distinct inputs accepted so far.
    pub async fn job_count(&self) -> usize {
        self.shared.state.lock().await.jobs.len()
    }

    /// Jobs whose background task has not yet published.
    pub async fn pending_count(&self) -> usize {
        self.shared.state.lock().await.jobs.pending_count()
    }

    /// Spawn the detached digest task for a freshly created job.
    fn dispatch(&self, id: JobId, input: String) {
        let coordinator = self.clone();
        tokio::spawn(async move {
            let started = Instant::now();
            let digest = coordinator.executor.execute(id, &input).await;
            coordinator.publish(id, digest, started.elapsed()).await;
        });
    }

    async fn publish(&self, id: JobId, digest: String, elapsed: std::time::Duration) {
        {
            let mut state = self.shared.state.lock().await;
            if !state.jobs.complete(id, digest) {
                tracing::warn!(job_id = %id, "Digest already published, ignoring");
            }
            state.stats.record_elapsed(elapsed);
        }
        self.shared.ready.notify_waiters();
        tracing::info!(job_id = %id, elapsed = ?elapsed, "Digest published");
    }
}
