use std::fmt;
use std::str::FromStr;

use crate::error::HasherError;

/// Sequential, 1-based job identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(u64);

impl JobId {
    /// Returns `None` for zero; ids start at 1.
    pub fn new(raw: u64) -> Option<Self> {
        (raw > 0).then_some(Self(raw))
    }

    /// The id assigned after `count` existing jobs.
    pub(crate) fn following(count: usize) -> Self {
        Self((count as u64).saturating_add(1))
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// Zero-based position in the job table.
    pub(crate) fn index(self) -> Option<usize> {
        usize::try_from(self.0 - 1).ok()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses the textual id a client sends in a lookup.
///
/// Signed parsing keeps `"0"` and `"-3"` distinct from garbage so the caller
/// gets `IdNotPositive` rather than `InvalidIdFormat`.
impl FromStr for JobId {
    type Err = HasherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: i64 = s
            .parse()
            .map_err(|_| HasherError::InvalidIdFormat(s.to_string()))?;
        if raw <= 0 {
            return Err(HasherError::IdNotPositive(raw));
        }
        Ok(Self(raw.unsigned_abs()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Ready,
}

/// One accepted input. Its id is its position in the [`JobTable`](super::JobTable).
#[derive(Debug, Clone, Default)]
pub struct Job {
    digest: Option<String>,
}

impl Job {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    pub fn status(&self) -> JobStatus {
        match self.digest {
            Some(_) => JobStatus::Ready,
            None => JobStatus::Pending,
        }
    }

    /// Publishes the digest. A job is completed at most once; later calls
    /// leave the first digest in place and return false.
    pub fn complete(&mut self, digest: String) -> bool {
        if self.digest.is_some() {
            return false;
        }
        self.digest = Some(digest);
        true
    }
}
