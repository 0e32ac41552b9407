//! In-memory gist source for testing and offline runs.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{FetchedBody, GistSource};
use crate::errors::{InlinerError, Result};

/// Gist source answering from a fixed table of responses.
///
/// URLs without an entry fail as if the connection had been refused.
/// Every requested URL is recorded, in request order.
#[derive(Debug, Default)]
pub struct StaticSource {
    responses: HashMap<String, FetchedBody>,
    requests: Mutex<Vec<String>>,
}

impl StaticSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a response for `url`.
    pub fn with_response(
        mut self,
        url: impl Into<String>,
        status: u16,
        body: impl Into<String>,
    ) -> Self {
        self.responses.insert(url.into(), FetchedBody::new(status, body));
        self
    }

    /// Returns the URLs requested so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl GistSource for StaticSource {
    async fn fetch(&self, url: &str) -> Result<FetchedBody> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| InlinerError::Other(format!("connection refused: {}", url)))
    }
}
