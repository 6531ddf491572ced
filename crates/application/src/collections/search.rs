//! Search result state.

use indexmap::IndexMap;
use projecthub_domain::{Project, ProjectId};

use super::state::merge_by_identity;

/// Read-only copy of the search results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchSnapshot {
    /// Query the results belong to; `None` when cleared.
    pub query: Option<String>,
    /// Matching records, deduplicated by id.
    pub items: Vec<Project>,
    /// Whether a search request is in flight.
    pub loading: bool,
}

/// Results of the latest search. Every request takes a sequence number;
/// a response that is not for the latest number is dropped.
#[derive(Debug, Default)]
pub(crate) struct SearchState {
    query: Option<String>,
    items: IndexMap<ProjectId, Project>,
    issued: u64,
    loading: bool,
}

impl SearchState {
    pub(crate) fn begin(&mut self) -> u64 {
        self.issued += 1;
        self.loading = true;
        self.issued
    }

    /// Replaces the results wholesale. Returns false if `ticket` was
    /// superseded.
    pub(crate) fn replace(&mut self, ticket: u64, query: &str, results: Vec<Project>) -> bool {
        if ticket != self.issued {
            return false;
        }
        self.items.clear();
        merge_by_identity(&mut self.items, results);
        self.query = Some(query.to_string());
        self.loading = false;
        true
    }

    /// Settles a failed request, keeping the previous results.
    pub(crate) fn settle(&mut self, ticket: u64) {
        if ticket == self.issued {
            self.loading = false;
        }
    }

    /// Empties the results and supersedes any request in flight.
    pub(crate) fn clear(&mut self) {
        self.issued += 1;
        self.items.clear();
        self.query = None;
        self.loading = false;
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn snapshot(&self) -> SearchSnapshot {
        SearchSnapshot {
            query: self.query.clone(),
            items: self.items.values().cloned().collect(),
            loading: self.loading,
        }
    }
}
