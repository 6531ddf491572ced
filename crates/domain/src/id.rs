//! ID generation utilities.

use uuid::Uuid;

/// Generates a correlation id for one outbound API call.
///
/// UUID v7, so ids sort by creation time.
#[must_use]
pub fn generate_request_id() -> String {
    Uuid::now_v7().to_string()
}
