use chrono::{DateTime, Utc};

/// One external feed to poll. Immutable once loaded from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A YouTube channel, identified by its channel ID (`UC...`)
    YouTubeChannel(String),
    /// A news RSS/Atom feed URL
    NewsFeed(String),
}

impl Source {
    /// The URL the fetcher polls for this source.
    pub fn feed_url(&self) -> String {
        match self {
            Source::YouTubeChannel(channel_id) => format!(
                "https://www.youtube.com/feeds/videos.xml?channel_id={}",
                channel_id
            ),
            Source::NewsFeed(url) => url.clone(),
        }
    }

    /// Stable key used to scope the seen-set for this source.
    pub fn key(&self) -> &str {
        match self {
            Source::YouTubeChannel(channel_id) => channel_id,
            Source::NewsFeed(url) => url,
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::YouTubeChannel(channel_id) => write!(f, "youtube:{}", channel_id),
            Source::NewsFeed(url) => write!(f, "{}", url),
        }
    }
}

/// One fetched content unit (video or article). Produced fresh on every
/// fetch and never persisted.
#[derive(Debug, Clone)]
pub struct Item {
    /// Stable identifier within the feed (guid / entry id)
    pub id: String,
    pub title: String,
    pub url: Option<String>,
    /// Plain-text summary, used by the keyword filter and message formatting
    pub summary: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Parsed feed page: the provider's latest items plus feed metadata.
#[derive(Debug, Clone)]
pub struct FetchedFeed {
    /// Feed title as reported by the provider
    pub title: Option<String>,
    pub items: Vec<Item>,
}

impl FetchedFeed {
    pub fn source_name(&self) -> &str {
        self.title.as_deref().unwrap_or("Unknown Source")
    }
}
