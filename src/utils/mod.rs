//! Utility modules.
//!
//! - [`HttpClient`]: shared HTTP client with explicit timeouts and status checking

mod http;

pub use http::HttpClient;
