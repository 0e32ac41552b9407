//! Retrieval of raw gist bodies.

mod http;
mod static_source;

use async_trait::async_trait;

use crate::errors::Result;

pub use http::HttpSource;
pub use static_source::StaticSource;

/// The HTTP status that marks a fetch as successful.
pub const STATUS_OK: u16 = 200;

/// A fetched response: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedBody {
    /// HTTP status code.
    pub status: u16,
    /// Response body, decoded as text.
    pub body: String,
}

impl FetchedBody {
    /// Creates a new FetchedBody.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true if the status is exactly 200.
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Source of raw gist content.
///
/// Transport failures are returned as `Err`; any response, whatever its
/// status, is returned as `Ok`.
#[async_trait]
pub trait GistSource: Send + Sync + std::fmt::Debug {
    /// Issues a GET for `url` and returns the response.
    async fn fetch(&self, url: &str) -> Result<FetchedBody>;
}
