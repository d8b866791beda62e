use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::models::{FetchedFeed, Source};
use super::parser::parse_feed;
use crate::{Error, Result};

const USER_AGENT: &str = concat!("feedherald/", env!("CARGO_PKG_VERSION"));

/// Seam between the watcher and the network. Tests substitute stub
/// implementations; production uses [`FeedFetcher`].
#[async_trait]
pub trait FetchSource: Send + Sync {
    /// Fetch the provider's latest page of items for a source.
    async fn fetch(&self, source: &Source) -> Result<FetchedFeed>;
}

/// Feed fetcher backed by a shared HTTP client.
///
/// No retries and no backoff: a failed fetch abandons the tick for that
/// source, and the polling schedule itself is the retry mechanism.
pub struct FeedFetcher {
    client: Client,
}

impl FeedFetcher {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl FetchSource for FeedFetcher {
    async fn fetch(&self, source: &Source) -> Result<FetchedFeed> {
        let url = source.feed_url();

        tracing::debug!("Fetching feed from: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Error::FeedParse(format!("HTTP {} for URL: {}", status, url)));
        }

        let content = response.bytes().await?;
        parse_feed(&content)
    }
}
