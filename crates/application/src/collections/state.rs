//! Per-collection pagination state.

use std::fmt;

use indexmap::IndexMap;
use indexmap::map::Entry;
use projecthub_domain::{Cursor, Project, ProjectId, ProjectPage};

/// The paginated project listings kept by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// Projects the user created.
    Owned,
    /// Projects the user joined with a PIN.
    Joined,
}

impl CollectionKind {
    /// Every paginated collection.
    pub const ALL: [Self; 2] = [Self::Owned, Self::Joined];

    /// Listing endpoint of the collection.
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Owned => "/api/projects/owned/",
            Self::Joined => "/api/projects/joined/",
        }
    }

    /// Short name, for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owned => "owned",
            Self::Joined => "joined",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a collection stands, for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionPhase {
    /// Nothing loaded yet.
    Empty,
    /// A page request is in flight.
    Loading,
    /// Some pages loaded, more available.
    Loaded,
    /// The server reported no further pages.
    Exhausted,
}

/// Read-only copy of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSnapshot {
    /// Records in first-seen order.
    pub items: Vec<Project>,
    /// Cursor of the next page.
    pub cursor: Option<Cursor>,
    /// Whether another page may exist.
    pub has_more: bool,
    /// Whether a page request is in flight.
    pub loading: bool,
    /// Derived phase.
    pub phase: CollectionPhase,
}

impl CollectionSnapshot {
    /// Ids of the items, in order.
    #[must_use]
    pub fn ids(&self) -> Vec<ProjectId> {
        self.items.iter().map(|p| p.id.clone()).collect()
    }
}

/// What a merge did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeStats {
    /// Records with a new id, appended at the end.
    pub appended: usize,
    /// Records that replaced an existing one in place.
    pub updated: usize,
}

/// Merges `incoming` into `items` by id: known ids are replaced where
/// they stand, new ids are appended in arrival order.
pub fn merge_by_identity(
    items: &mut IndexMap<ProjectId, Project>,
    incoming: impl IntoIterator<Item = Project>,
) -> MergeStats {
    let mut stats = MergeStats::default();
    for project in incoming {
        match items.entry(project.id.clone()) {
            Entry::Occupied(mut slot) => {
                slot.insert(project);
                stats.updated += 1;
            }
            Entry::Vacant(slot) => {
                slot.insert(project);
                stats.appended += 1;
            }
        }
    }
    stats
}

/// Why a `load_more` call did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A page request for this collection is already in flight.
    InFlight,
    /// The server reported the last page.
    Exhausted,
}

/// Permission to fetch one page, tied to the epoch it was issued in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PageTicket {
    pub(crate) epoch: u64,
    pub(crate) cursor: Option<Cursor>,
}

/// Mutable state of one collection. Lives behind a lock that is never
/// held across an await.
///
/// `epoch` increases on every reset; a page fetched under an older epoch
/// is dropped instead of merged into the fresh collection.
#[derive(Debug)]
pub(crate) struct CollectionState {
    items: IndexMap<ProjectId, Project>,
    cursor: Option<Cursor>,
    has_more: bool,
    loading: bool,
    epoch: u64,
}

impl Default for CollectionState {
    fn default() -> Self {
        Self {
            items: IndexMap::new(),
            cursor: None,
            has_more: true,
            loading: false,
            epoch: 0,
        }
    }
}

impl CollectionState {
    pub(crate) fn begin_load(&mut self) -> Result<PageTicket, SkipReason> {
        if self.loading {
            return Err(SkipReason::InFlight);
        }
        if !self.has_more {
            return Err(SkipReason::Exhausted);
        }
        self.loading = true;
        Ok(PageTicket {
            epoch: self.epoch,
            cursor: self.cursor.clone(),
        })
    }

    /// Merges a fetched page. Returns `None` when the page belongs to an
    /// earlier epoch.
    pub(crate) fn apply_page(&mut self, epoch: u64, page: ProjectPage) -> Option<MergeStats> {
        if epoch != self.epoch {
            return None;
        }
        let stats = merge_by_identity(&mut self.items, page.results);
        self.cursor = page.next_cursor;
        self.has_more = page.has_more;
        self.loading = false;
        Some(stats)
    }

    /// Clears the loading flag, unless a reset moved to a newer epoch
    /// whose own request now owns it.
    pub(crate) fn end_load(&mut self, epoch: u64) {
        if epoch == self.epoch {
            self.loading = false;
        }
    }

    pub(crate) fn reset(&mut self) {
        self.items.clear();
        self.cursor = None;
        self.has_more = true;
        self.loading = false;
        self.epoch += 1;
    }

    pub(crate) fn phase(&self) -> CollectionPhase {
        if self.loading {
            CollectionPhase::Loading
        } else if !self.has_more {
            CollectionPhase::Exhausted
        } else if self.items.is_empty() && self.cursor.is_none() {
            CollectionPhase::Empty
        } else {
            CollectionPhase::Loaded
        }
    }

    pub(crate) fn snapshot(&self) -> CollectionSnapshot {
        CollectionSnapshot {
            items: self.items.values().cloned().collect(),
            cursor: self.cursor.clone(),
            has_more: self.has_more,
            loading: self.loading,
            phase: self.phase(),
        }
    }
}
