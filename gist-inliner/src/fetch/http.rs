//! HTTP gist source backed by reqwest.

use async_trait::async_trait;

use super::{FetchedBody, GistSource};
use crate::config::FetchConfig;
use crate::errors::Result;

/// Gist source that issues real HTTP requests.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    /// Creates a new HTTP source with the configured timeout and user agent.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl GistSource for HttpSource {
    async fn fetch(&self, url: &str) -> Result<FetchedBody> {
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(FetchedBody { status, body })
    }
}
