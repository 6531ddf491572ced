//! Search-as-you-type scheduling.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{trace, warn};

use super::store::PaginatedCollectionStore;

/// Default quiet period before a typed query is sent.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Default)]
struct Pending {
    last_query: Option<String>,
    task: Option<JoinHandle<()>>,
}

/// Calls [`PaginatedCollectionStore::search`] once input has been quiet
/// for `delay`.
///
/// Unchanged input is ignored; new input cancels the scheduled search.
/// Dropping the debouncer cancels whatever is pending. Must be used
/// inside a Tokio runtime.
pub struct SearchDebouncer {
    store: Arc<PaginatedCollectionStore>,
    delay: Duration,
    pending: Mutex<Pending>,
}

impl SearchDebouncer {
    /// Creates a debouncer in front of `store`.
    #[must_use]
    pub fn new(store: Arc<PaginatedCollectionStore>, delay: Duration) -> Self {
        Self {
            store,
            delay,
            pending: Mutex::default(),
        }
    }

    /// Feeds the current contents of the search box. Returns true if a
    /// search was scheduled.
    pub fn input(&self, text: &str) -> bool {
        let query = text.trim().to_string();
        let mut pending = self.pending.lock();
        if pending.last_query.as_deref() == Some(query.as_str()) {
            trace!(query, "unchanged search input ignored");
            return false;
        }
        if let Some(task) = pending.task.take() {
            task.abort();
        }
        pending.last_query = Some(query.clone());

        let store = Arc::clone(&self.store);
        let delay = self.delay;
        pending.task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(error) = store.search(&query).await {
                warn!(%error, "debounced search failed");
            }
        }));
        true
    }

    /// Waits for the scheduled search, if any, to run and settle.
    pub async fn flush(&self) {
        let task = self.pending.lock().task.take();
        if let Some(task) = task
            && let Err(error) = task.await
            && !error.is_cancelled()
        {
            warn!(%error, "debounced search task failed");
        }
    }

    /// Cancels the scheduled search, if any.
    pub fn cancel(&self) {
        let mut pending = self.pending.lock();
        pending.last_query = None;
        if let Some(task) = pending.task.take() {
            task.abort();
        }
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
