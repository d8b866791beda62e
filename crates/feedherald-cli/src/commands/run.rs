use std::sync::Arc;

use anyhow::Result;
use tokio::sync::watch;
use tracing::{debug, info};

use feedherald_core::notify::{ChannelDispatcher, ChatClient, Dispatcher, MessageStyle};
use feedherald_core::watcher::WatcherStatus;
use feedherald_core::BotConfig;

/// Start both watchers and run until ctrl-c.
pub async fn run(config: BotConfig) -> Result<()> {
    let mut youtube = super::youtube_watcher(&config)?;
    let mut news = super::news_watcher(&config)?;

    info!(
        "Starting feedherald: {} YouTube channels every {}s, {} news feeds every {}s, posting to '{}'",
        youtube.sources().len(),
        youtube.interval().as_secs(),
        news.sources().len(),
        news.interval().as_secs(),
        config.chat_channel
    );

    let video_dispatcher: Arc<dyn Dispatcher> = Arc::new(ChannelDispatcher::new(
        ChatClient::new(&config.chat_url, &config.chat_token)?,
        &config.chat_channel,
        MessageStyle::Video,
    ));
    let article_dispatcher: Arc<dyn Dispatcher> = Arc::new(ChannelDispatcher::new(
        ChatClient::new(&config.chat_url, &config.chat_token)?,
        &config.chat_channel,
        MessageStyle::Article,
    ));

    // Create shutdown channel
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
        let _ = shutdown_tx.send(true);
    });

    spawn_status_observer("youtube", youtube.status_receiver());
    spawn_status_observer("news", news.status_receiver());

    let youtube_task = tokio::spawn(youtube.run_forever(video_dispatcher, shutdown_rx.clone()));
    let news_task = tokio::spawn(news.run_forever(article_dispatcher, shutdown_rx));

    let (youtube_result, news_result) = tokio::join!(youtube_task, news_task);
    youtube_result?;
    news_result?;

    info!("feedherald stopped");
    Ok(())
}

/// Read-only observer of watcher state: logs each published status snapshot.
fn spawn_status_observer(name: &'static str, mut rx: watch::Receiver<WatcherStatus>) {
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let status = rx.borrow().clone();
            debug!(
                "[{}] status: {} sources, {} items tracked, last tick emitted {}",
                name, status.sources, status.items_tracked, status.last_tick_emitted
            );
        }
    });
}
