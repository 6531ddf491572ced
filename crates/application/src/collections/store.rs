//! Cursor-paginated project collections and search.

use std::sync::Arc;

use parking_lot::Mutex;
use projecthub_domain::{ApiRequest, ProjectPage, SearchResults};
use thiserror::Error;
use tracing::{debug, trace, warn};

use super::search::{SearchSnapshot, SearchState};
use super::state::{
    CollectionKind, CollectionSnapshot, CollectionState, MergeStats, SkipReason,
};
use crate::events::AppEvent;
use crate::transport::{AuthenticatedTransport, TransportError};

/// Search endpoint; not paginated.
pub const SEARCH_PATH: &str = "/api/projects/search/";

/// Tuning of the collection store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// `limit` sent with every page request.
    pub page_size: u32,
    /// Shorter (trimmed) queries clear the results instead of searching.
    pub search_min_chars: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            page_size: 20,
            search_min_chars: 2,
        }
    }
}

/// Result of [`PaginatedCollectionStore::load_more`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No request was sent.
    Skipped(SkipReason),
    /// A page was merged.
    Loaded(MergeStats),
    /// The collection was reset while the page was in flight; the page was
    /// dropped.
    Discarded,
}

/// Result of [`PaginatedCollectionStore::search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The query was too short; results were cleared without a request.
    Cleared,
    /// The results were replaced.
    Replaced {
        /// Number of results now held.
        count: usize,
    },
    /// A newer search started before this one answered.
    Superseded,
}

/// Collection store errors. The collection keeps its items, cursor and
/// `has_more` when a request fails.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A page request failed.
    #[error("failed to load {kind} projects: {source}")]
    LoadFailed {
        /// Collection that failed.
        kind: CollectionKind,
        /// Underlying failure.
        #[source]
        source: TransportError,
    },

    /// A search request failed.
    #[error("project search failed: {source}")]
    SearchFailed {
        /// Underlying failure.
        #[source]
        source: TransportError,
    },
}

impl StoreError {
    /// The transport failure behind this error.
    #[must_use]
    pub const fn transport(&self) -> &TransportError {
        match self {
            Self::LoadFailed { source, .. } | Self::SearchFailed { source } => source,
        }
    }

    /// Returns true if the session was torn down; the user has already
    /// been sent to sign in.
    #[must_use]
    pub const fn is_session_expired(&self) -> bool {
        self.transport().is_session_expired()
    }
}

/// Owns the owned and joined project lists and the search results.
///
/// Each collection has its own lock and its own loading flag, so loading
/// one never blocks the other. Locks are held only for bookkeeping, never
/// while a request is in flight.
pub struct PaginatedCollectionStore {
    transport: Arc<AuthenticatedTransport>,
    options: StoreOptions,
    owned: Mutex<CollectionState>,
    joined: Mutex<CollectionState>,
    search: Mutex<SearchState>,
}

struct LoadingGuard<'a> {
    slot: &'a Mutex<CollectionState>,
    epoch: u64,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.slot.lock().end_load(self.epoch);
    }
}

struct SearchingGuard<'a> {
    slot: &'a Mutex<SearchState>,
    ticket: u64,
}

impl Drop for SearchingGuard<'_> {
    fn drop(&mut self) {
        self.slot.lock().settle(self.ticket);
    }
}

impl PaginatedCollectionStore {
    /// Creates a store with empty collections.
    #[must_use]
    pub fn new(transport: Arc<AuthenticatedTransport>, options: StoreOptions) -> Self {
        Self {
            transport,
            options,
            owned: Mutex::default(),
            joined: Mutex::default(),
            search: Mutex::default(),
        }
    }

    /// The store's options.
    #[must_use]
    pub const fn options(&self) -> StoreOptions {
        self.options
    }

    const fn slot(&self, kind: CollectionKind) -> &Mutex<CollectionState> {
        match kind {
            CollectionKind::Owned => &self.owned,
            CollectionKind::Joined => &self.joined,
        }
    }

    /// Fetches the next page of `kind` and merges it by id.
    ///
    /// Does nothing when a page is already in flight for `kind` or the
    /// server reported the last page.
    ///
    /// # Errors
    ///
    /// Returns `LoadFailed` when the request fails. Items, cursor and
    /// `has_more` are left as they were, so the call can be retried.
    pub async fn load_more(&self, kind: CollectionKind) -> Result<LoadOutcome, StoreError> {
        let slot = self.slot(kind);
        let begun = slot.lock().begin_load();
        let ticket = match begun {
            Ok(ticket) => ticket,
            Err(reason) => {
                trace!(%kind, ?reason, "load skipped");
                return Ok(LoadOutcome::Skipped(reason));
            }
        };
        let _loading = LoadingGuard {
            slot,
            epoch: ticket.epoch,
        };

        let mut request = ApiRequest::get(kind.endpoint());
        if let Some(cursor) = &ticket.cursor {
            request = request.with_query("cursor", cursor.as_str());
        }
        let request = request.with_query("limit", self.options.page_size.to_string());

        debug!(%kind, cursor = ?ticket.cursor, "loading page");
        let page: ProjectPage = self.transport.fetch_json(request).await.map_err(|source| {
            warn!(%kind, error = %source, "page load failed");
            StoreError::LoadFailed { kind, source }
        })?;

        let applied = slot.lock().apply_page(ticket.epoch, page);
        Ok(match applied {
            Some(stats) => {
                debug!(%kind, appended = stats.appended, updated = stats.updated, "page merged");
                LoadOutcome::Loaded(stats)
            }
            None => {
                debug!(%kind, "collection reset while loading, page dropped");
                LoadOutcome::Discarded
            }
        })
    }

    /// Empties `kind`; the next `load_more` starts from the first page.
    pub fn reset(&self, kind: CollectionKind) {
        self.slot(kind).lock().reset();
        debug!(%kind, "collection reset");
        self.transport
            .events()
            .publish(AppEvent::CollectionReset { kind });
    }

    /// Resets `kind` and loads its first page.
    ///
    /// # Errors
    ///
    /// As [`PaginatedCollectionStore::load_more`].
    pub async fn reload(&self, kind: CollectionKind) -> Result<LoadOutcome, StoreError> {
        self.reset(kind);
        self.load_more(kind).await
    }

    /// Read-only copy of `kind`.
    #[must_use]
    pub fn snapshot(&self, kind: CollectionKind) -> CollectionSnapshot {
        self.slot(kind).lock().snapshot()
    }

    /// Replaces the search results with the server's matches for `query`.
    ///
    /// The query is trimmed; below the minimum length the results are
    /// cleared and nothing is sent. A response that arrives after a newer
    /// search started is dropped.
    ///
    /// # Errors
    ///
    /// Returns `SearchFailed` when the request fails; earlier results are
    /// kept.
    pub async fn search(&self, query: &str) -> Result<SearchOutcome, StoreError> {
        let query = query.trim();
        if query.chars().count() < self.options.search_min_chars {
            self.search.lock().clear();
            trace!("search query too short, results cleared");
            return Ok(SearchOutcome::Cleared);
        }

        let ticket = self.search.lock().begin();
        // Settles the ticket even when this future is dropped mid-request.
        let _searching = SearchingGuard {
            slot: &self.search,
            ticket,
        };
        let request = ApiRequest::get(SEARCH_PATH).with_query("q", query);
        debug!(query, "searching projects");
        let found = self
            .transport
            .fetch_json::<SearchResults>(request)
            .await
            .map_err(|source| {
                warn!(query, error = %source, "search failed");
                StoreError::SearchFailed { source }
            })?;

        let mut search = self.search.lock();
        if search.replace(ticket, query, found.results) {
            Ok(SearchOutcome::Replaced {
                count: search.len(),
            })
        } else {
            trace!(query, "superseded search response dropped");
            Ok(SearchOutcome::Superseded)
        }
    }

    /// Empties the search results.
    pub fn clear_search(&self) {
        self.search.lock().clear();
    }

    /// Read-only copy of the search results.
    #[must_use]
    pub fn search_results(&self) -> SearchSnapshot {
        self.search.lock().snapshot()
    }
}

impl std::fmt::Debug for PaginatedCollectionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginatedCollectionStore")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::collections::CollectionPhase;
    use crate::ports::HttpClientError;
    use crate::testing::{Harness, page_json, project_json};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;
    use tokio::sync::Notify;

    const OWNED: &str = "/api/projects/owned/";
    const JOINED: &str = "/api/projects/joined/";

    fn state_ids(snapshot: &CollectionSnapshot) -> Vec<String> {
        snapshot.ids().iter().map(ToString::to_string).collect()
    }

    fn store(h: &Harness) -> PaginatedCollectionStore {
        PaginatedCollectionStore::new(h.transport.clone(), StoreOptions::default())
    }

    #[tokio::test]
    async fn test_pages_merge_by_identity() {
        let h = Harness::signed_in("access-1", "refresh-1");
        let store = store(&h);
        h.http
            .reply(OWNED, 200, page_json(&[(1, "A"), (2, "B")], Some("c2"), true));
        h.http
            .reply(OWNED, 200, page_json(&[(2, "B2"), (3, "C")], None, false));

        store.load_more(CollectionKind::Owned).await.unwrap();
        let outcome = store.load_more(CollectionKind::Owned).await.unwrap();

        assert_eq!(
            outcome,
            LoadOutcome::Loaded(MergeStats {
                appended: 1,
                updated: 1
            })
        );
        let snapshot = store.snapshot(CollectionKind::Owned);
        assert_eq!(state_ids(&snapshot), vec!["1", "2", "3"]);
        assert_eq!(snapshot.items[1].name, "B2");
        assert!(!snapshot.has_more);
        assert_eq!(snapshot.phase, CollectionPhase::Exhausted);

        let calls = h.http.calls_to(OWNED);
        assert_eq!(calls[0].query_value("cursor"), None);
        assert_eq!(calls[0].query_value("limit"), Some("20"));
        assert_eq!(calls[1].query_value("cursor"), Some("c2"));
    }

    #[tokio::test]
    async fn test_exhausted_collection_sends_nothing() {
        let h = Harness::signed_in("access-1", "refresh-1");
        let store = store(&h);
        h.http.reply(OWNED, 200, page_json(&[(1, "A")], None, false));

        store.load_more(CollectionKind::Owned).await.unwrap();
        let outcome = store.load_more(CollectionKind::Owned).await.unwrap();

        assert_eq!(outcome, LoadOutcome::Skipped(SkipReason::Exhausted));
        assert_eq!(h.http.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_load_while_loading_is_a_no_op() {
        let h = Harness::signed_in("access-1", "refresh-1");
        let store = store(&h);
        let gate = Arc::new(Notify::new());
        h.http.reply_gated(
            OWNED,
            200,
            page_json(&[(1, "A")], Some("c2"), true),
            gate.clone(),
        );

        let second = async {
            while h.http.calls().is_empty() {
                tokio::task::yield_now().await;
            }
            assert!(store.snapshot(CollectionKind::Owned).loading);
            let outcome = store.load_more(CollectionKind::Owned).await;
            gate.notify_one();
            outcome
        };
        let (first, second) = tokio::join!(store.load_more(CollectionKind::Owned), second);

        assert!(matches!(first.unwrap(), LoadOutcome::Loaded(_)));
        assert_eq!(second.unwrap(), LoadOutcome::Skipped(SkipReason::InFlight));
        assert_eq!(h.http.calls().len(), 1);
        assert!(!store.snapshot(CollectionKind::Owned).loading);
    }

    #[tokio::test]
    async fn test_collections_load_independently() {
        let h = Harness::signed_in("access-1", "refresh-1");
        let store = store(&h);
        h.http.reply(OWNED, 200, page_json(&[(1, "Mine")], None, false));
        h.http
            .reply(JOINED, 200, page_json(&[(1, "Theirs"), (5, "E")], None, false));

        let (owned, joined) = tokio::join!(
            store.load_more(CollectionKind::Owned),
            store.load_more(CollectionKind::Joined)
        );

        assert!(owned.is_ok() && joined.is_ok());
        assert_eq!(state_ids(&store.snapshot(CollectionKind::Owned)), vec!["1"]);
        assert_eq!(
            state_ids(&store.snapshot(CollectionKind::Joined)),
            vec!["1", "5"]
        );
    }

    #[tokio::test]
    async fn test_failure_keeps_state_and_allows_retry() {
        let h = Harness::signed_in("access-1", "refresh-1");
        let store = store(&h);
        h.http
            .reply(OWNED, 200, page_json(&[(1, "A")], Some("c2"), true));
        h.http.reply(OWNED, 500, json!({"detail": "boom"}));
        h.http.reply(OWNED, 200, page_json(&[(2, "B")], None, false));

        store.load_more(CollectionKind::Owned).await.unwrap();
        let error = store.load_more(CollectionKind::Owned).await.unwrap_err();

        assert!(matches!(
            error,
            StoreError::LoadFailed {
                kind: CollectionKind::Owned,
                ..
            }
        ));
        let snapshot = store.snapshot(CollectionKind::Owned);
        assert_eq!(state_ids(&snapshot), vec!["1"]);
        assert!(snapshot.has_more);
        assert!(!snapshot.loading);

        store.load_more(CollectionKind::Owned).await.unwrap();
        assert_eq!(h.http.calls_to(OWNED)[2].query_value("cursor"), Some("c2"));
        assert_eq!(
            state_ids(&store.snapshot(CollectionKind::Owned)),
            vec!["1", "2"]
        );
    }

    #[tokio::test]
    async fn test_network_failure_clears_loading() {
        let h = Harness::signed_in("access-1", "refresh-1");
        let store = store(&h);
        h.http
            .fail(OWNED, HttpClientError::ConnectionFailed("down".to_string()));

        let error = store.load_more(CollectionKind::Owned).await.unwrap_err();

        assert!(matches!(error.transport(), TransportError::Network(_)));
        assert_eq!(
            store.snapshot(CollectionKind::Owned).phase,
            CollectionPhase::Empty
        );
        assert_eq!(h.transport.busy().pending(), 0);
    }

    #[tokio::test]
    async fn test_reset_then_reload_starts_over() {
        let h = Harness::signed_in("access-1", "refresh-1");
        let store = store(&h);
        let mut events = h.events.subscribe();
        h.http.reply(OWNED, 200, page_json(&[(1, "A")], None, false));
        h.http
            .reply(OWNED, 200, page_json(&[(9, "New"), (1, "A")], Some("c2"), true));

        store.load_more(CollectionKind::Owned).await.unwrap();
        store.reset(CollectionKind::Owned);
        let after_reset = store.snapshot(CollectionKind::Owned);
        assert!(after_reset.items.is_empty());
        assert!(after_reset.has_more);
        assert_eq!(after_reset.phase, CollectionPhase::Empty);
        assert_eq!(
            events.try_recv().unwrap(),
            AppEvent::CollectionReset {
                kind: CollectionKind::Owned
            }
        );

        store.reload(CollectionKind::Owned).await.unwrap();
        assert_eq!(
            state_ids(&store.snapshot(CollectionKind::Owned)),
            vec!["9", "1"]
        );
        assert_eq!(h.http.calls_to(OWNED)[1].query_value("cursor"), None);
    }

    #[tokio::test]
    async fn test_reset_during_load_drops_stale_page() {
        let h = Harness::signed_in("access-1", "refresh-1");
        let store = store(&h);
        let gate = Arc::new(Notify::new());
        h.http
            .reply_gated(OWNED, 200, page_json(&[(7, "Stale")], None, false), gate.clone());

        let interrupt = async {
            while h.http.calls().is_empty() {
                tokio::task::yield_now().await;
            }
            store.reset(CollectionKind::Owned);
            gate.notify_one();
        };
        let (outcome, ()) = tokio::join!(store.load_more(CollectionKind::Owned), interrupt);

        assert_eq!(outcome.unwrap(), LoadOutcome::Discarded);
        let snapshot = store.snapshot(CollectionKind::Owned);
        assert!(snapshot.items.is_empty());
        assert!(snapshot.has_more);
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn test_expired_session_surfaces_from_load() {
        let h = Harness::signed_in("access-1", "refresh-1");
        let store = store(&h);
        h.http.reply(OWNED, 401, json!({}));
        h.http.reply("/api/auth/token/refresh/", 401, json!({}));

        let error = store.load_more(CollectionKind::Owned).await.unwrap_err();

        assert!(error.is_session_expired());
        assert!(!store.snapshot(CollectionKind::Owned).loading);
    }

    #[tokio::test]
    async fn test_short_query_clears_without_request() {
        let h = Harness::signed_in("access-1", "refresh-1");
        let store = store(&h);
        h.http.reply(
            SEARCH_PATH,
            200,
            json!({"results": [project_json(1, "Alpha")]}),
        );

        store.search("alpha").await.unwrap();
        let outcome = store.search(" a ").await.unwrap();

        assert_eq!(outcome, SearchOutcome::Cleared);
        assert_eq!(store.search_results(), SearchSnapshot::default());
        assert_eq!(h.http.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_search_replaces_results() {
        let h = Harness::signed_in("access-1", "refresh-1");
        let store = store(&h);
        h.http.reply(
            SEARCH_PATH,
            200,
            json!({"results": [
                project_json(1, "Alpha"),
                project_json(2, "Alps"),
                project_json(1, "Alpha"),
            ]}),
        );
        h.http.reply(
            SEARCH_PATH,
            200,
            json!({"results": [project_json(3, "Alpine")]}),
        );

        let first = store.search("al").await.unwrap();
        assert_eq!(first, SearchOutcome::Replaced { count: 2 });

        store.search("  alpi ").await.unwrap();
        let results = store.search_results();
        assert_eq!(results.query.as_deref(), Some("alpi"));
        assert_eq!(results.items.len(), 1);
        assert_eq!(results.items[0].name, "Alpine");
        assert_eq!(h.http.calls()[1].query_value("q"), Some("alpi"));
    }

    #[tokio::test]
    async fn test_superseded_search_is_dropped() {
        let h = Harness::signed_in("access-1", "refresh-1");
        let store = store(&h);
        let gate = Arc::new(Notify::new());
        h.http.reply_gated(
            SEARCH_PATH,
            200,
            json!({"results": [project_json(1, "Old")]}),
            gate.clone(),
        );
        h.http
            .reply(SEARCH_PATH, 200, json!({"results": [project_json(2, "New")]}));

        let newer = async {
            while h.http.calls().is_empty() {
                tokio::task::yield_now().await;
            }
            let outcome = store.search("new").await;
            gate.notify_one();
            outcome
        };
        let (older, newer) = tokio::join!(store.search("old"), newer);

        assert_eq!(older.unwrap(), SearchOutcome::Superseded);
        assert_eq!(newer.unwrap(), SearchOutcome::Replaced { count: 1 });
        let results = store.search_results();
        assert_eq!(results.items[0].name, "New");
        assert!(!results.loading);
    }

    #[tokio::test]
    async fn test_failed_search_keeps_results() {
        let h = Harness::signed_in("access-1", "refresh-1");
        let store = store(&h);
        h.http
            .reply(SEARCH_PATH, 200, json!({"results": [project_json(1, "A1")]}));
        h.http.reply(SEARCH_PATH, 503, json!({}));

        store.search("a1").await.unwrap();
        let error = store.search("a12").await.unwrap_err();

        assert!(matches!(error, StoreError::SearchFailed { .. }));
        let results = store.search_results();
        assert_eq!(results.items.len(), 1);
        assert!(!results.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_search_clears_loading() {
        let h = Harness::signed_in("access-1", "refresh-1");
        let store = store(&h);
        let gate = Arc::new(Notify::new());
        h.http.reply_gated(SEARCH_PATH, 200, json!({"results": []}), gate);

        let search = store.search("alpha");
        let abandoned = tokio::time::timeout(Duration::from_millis(50), search).await;

        assert!(abandoned.is_err());
        assert!(!store.search_results().loading);
        assert_eq!(h.transport.busy().pending(), 0);
    }
}
