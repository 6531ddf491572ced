//! Project collections backing the infinite-scroll lists.

mod debounce;
mod search;
mod state;
mod store;

pub use debounce::{DEFAULT_SEARCH_DEBOUNCE, SearchDebouncer};
pub use search::SearchSnapshot;
pub use state::{
    CollectionKind, CollectionPhase, CollectionSnapshot, MergeStats, SkipReason,
    merge_by_identity,
};
pub use store::{
    LoadOutcome, PaginatedCollectionStore, SEARCH_PATH, SearchOutcome, StoreError,
    StoreOptions,
};
