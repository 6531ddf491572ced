//! Inbound response types.

mod api_response;
mod error_payload;

pub use api_response::{ApiResponse, StatusCode};
pub use error_payload::ErrorPayload;
