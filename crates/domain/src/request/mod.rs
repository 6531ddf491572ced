//! Outbound request types.

mod api_request;
mod method;

pub use api_request::{Access, ApiRequest};
pub use method::HttpMethod;
