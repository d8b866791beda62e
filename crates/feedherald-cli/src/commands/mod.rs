pub mod check;
pub mod run;
pub mod sources;

use std::time::Duration;

use feedherald_core::feed::{FeedFetcher, Source};
use feedherald_core::watcher::FeedWatcher;
use feedherald_core::{BotConfig, Result};

/// Build the YouTube watcher from configuration.
pub fn youtube_watcher(config: &BotConfig) -> Result<FeedWatcher<FeedFetcher>> {
    let fetcher = FeedFetcher::new(config.request_timeout_secs)?;
    let sources = config
        .youtube_channels
        .iter()
        .map(|id| Source::YouTubeChannel(id.clone()))
        .collect();

    Ok(FeedWatcher::new(
        "youtube",
        fetcher,
        sources,
        Duration::from_secs(config.youtube_check_interval_secs),
    ))
}

/// Build the news watcher from configuration.
pub fn news_watcher(config: &BotConfig) -> Result<FeedWatcher<FeedFetcher>> {
    let fetcher = FeedFetcher::new(config.request_timeout_secs)?;
    let sources = config
        .news_feeds
        .iter()
        .map(|url| Source::NewsFeed(url.clone()))
        .collect();

    Ok(FeedWatcher::new(
        "news",
        fetcher,
        sources,
        Duration::from_secs(config.news_check_interval_secs),
    )
    .with_keywords(&config.news_keywords))
}
