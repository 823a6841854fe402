use std::collections::HashMap;

use crate::coordinator::job::JobId;

/// Maps a raw submitted value to the id it was first assigned.
///
/// Keys compare by exact value, not by digest. Entries are never removed or
/// rebound for the lifetime of the index.
#[derive(Debug, Default)]
pub struct DedupIndex {
    ids: HashMap<String, JobId>,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, input: &str) -> Option<JobId> {
        self.ids.get(input).copied()
    }

    /// Bind `input` to `id` unless it is already bound. Returns the id the
    /// input resolves to after the call.
    pub fn insert(&mut self, input: String, id: JobId) -> JobId {
        *self.ids.entry(input).or_insert(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
