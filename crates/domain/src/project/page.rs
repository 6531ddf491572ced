//! Cursor-paginated listing envelopes.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Project;

/// Opaque server-issued position to resume a listing from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Wraps a cursor token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page of the owned or joined listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPage {
    /// Records in server order.
    #[serde(default)]
    pub results: Vec<Project>,
    /// Cursor of the next page; `None` once the listing is exhausted.
    #[serde(default)]
    pub next_cursor: Option<Cursor>,
    /// Whether more pages follow.
    pub has_more: bool,
}

/// Results of a project search. Search is not paginated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Matching records.
    #[serde(default)]
    pub results: Vec<Project>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_with_cursor() {
        let page: ProjectPage = serde_json::from_value(json!({
            "results": [{"id": 1, "name": "A", "role": "root"}],
            "next_cursor": "c1",
            "has_more": true
        }))
        .unwrap();

        assert_eq!(page.results.len(), 1);
        assert_eq!(page.next_cursor, Some(Cursor::new("c1")));
        assert!(page.has_more);
    }

    #[test]
    fn test_last_page_has_null_cursor() {
        let page: ProjectPage = serde_json::from_value(json!({
            "results": [],
            "next_cursor": null,
            "has_more": false
        }))
        .unwrap();

        assert!(page.next_cursor.is_none());
        assert!(!page.has_more);
    }

    #[test]
    fn test_missing_has_more_is_rejected() {
        let result = serde_json::from_value::<ProjectPage>(json!({"results": []}));
        assert!(result.is_err());
    }
}
