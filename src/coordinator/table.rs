use crate::coordinator::job::{Job, JobId, JobStatus};
use crate::error::{HasherError, Result};

/// Append-only job storage. A job's id is its 1-based position, so ids are
/// dense and never reused.
#[derive(Debug, Default)]
pub struct JobTable {
    jobs: Vec<Job>,
}

impl JobTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pending job and return its id (`len + 1`).
    pub fn push_pending(&mut self) -> JobId {
        let id = JobId::following(self.jobs.len());
        self.jobs.push(Job::new());
        id
    }

    pub fn get(&self, id: JobId) -> Option<&Job> {
        id.index().and_then(|i| self.jobs.get(i))
    }

    /// Digest for `id`, `Ok(None)` while still pending.
    pub fn digest(&self, id: JobId) -> Result<Option<&str>> {
        self.get(id)
            .map(Job::digest)
            .ok_or(HasherError::IdOutOfRange {
                id: id.get(),
                jobs: self.len() as u64,
            })
    }

    /// Publish a digest into the job at `id`. Returns false if the id is
    /// unknown or the job was already completed.
    pub fn complete(&mut self, id: JobId, digest: String) -> bool {
        id.index()
            .and_then(|i| self.jobs.get_mut(i))
            .is_some_and(|job| job.complete(digest))
    }

    pub fn pending_count(&self) -> usize {
        self.jobs
            .iter()
            .filter(|j| j.status() == JobStatus::Pending)
            .count()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> JobId {
        JobId::new(raw).unwrap()
    }

    #[test]
    fn ids_are_dense_and_one_based() {
        let mut table = JobTable::new();
        assert!(table.is_empty());
        assert_eq!(table.push_pending(), id(1));
        assert_eq!(table.push_pending(), id(2));
        assert_eq!(table.push_pending(), id(3));
        assert_eq!(table.len(), 3);
        assert_eq!(table.pending_count(), 3);
    }

    #[test]
    fn digest_out_of_range() {
        let mut table = JobTable::new();
        table.push_pending();
        let err = table.digest(id(2)).unwrap_err();
        assert!(matches!(err, HasherError::IdOutOfRange { id: 2, jobs: 1 }));
    }

    #[test]
    fn complete_publishes_once() {
        let mut table = JobTable::new();
        let job = table.push_pending();
        assert_eq!(table.digest(job).unwrap(), None);

        assert!(table.complete(job, "abc".to_string()));
        assert_eq!(table.digest(job).unwrap(), Some("abc"));
        assert_eq!(table.pending_count(), 0);

        assert!(!table.complete(job, "xyz".to_string()));
        assert_eq!(table.digest(job).unwrap(), Some("abc"));
    }

    #[test]
    fn complete_unknown_id() {
        let mut table = JobTable::new();
        assert!(!table.complete(id(1), "abc".to_string()));
        assert!(table.get(id(1)).is_none());
    }
}
