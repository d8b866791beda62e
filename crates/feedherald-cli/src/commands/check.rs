use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use feedherald_core::feed::Item;
use feedherald_core::notify::{
    format_message, ChannelDispatcher, ChatClient, Dispatcher, MessageStyle,
};
use feedherald_core::watcher::TickSummary;
use feedherald_core::BotConfig;

/// Prints formatted messages instead of posting them.
struct PrintDispatcher {
    style: MessageStyle,
}

#[async_trait]
impl Dispatcher for PrintDispatcher {
    async fn dispatch(&self, item: &Item, source_name: &str) -> feedherald_core::Result<()> {
        println!("  {}", format_message(self.style, item, source_name));
        Ok(())
    }
}

/// Run a single polling tick per watcher and print the outcome.
///
/// On a fresh process every source gets its priming pass, so the first
/// `check` validates configuration and connectivity without posting.
pub async fn run(config: BotConfig, post: bool) -> Result<()> {
    let dispatcher_for = |style: MessageStyle| -> Result<Arc<dyn Dispatcher>> {
        if post {
            Ok(Arc::new(ChannelDispatcher::new(
                ChatClient::new(&config.chat_url, &config.chat_token)?,
                &config.chat_channel,
                style,
            )))
        } else {
            Ok(Arc::new(PrintDispatcher { style }))
        }
    };

    let video_dispatcher = dispatcher_for(MessageStyle::Video)?;
    let article_dispatcher = dispatcher_for(MessageStyle::Article)?;

    let mut youtube = super::youtube_watcher(&config)?;
    println!("Checking {} YouTube channels...", youtube.sources().len());
    let summary = youtube.tick(video_dispatcher.as_ref()).await;
    print_summary(&summary);

    let mut news = super::news_watcher(&config)?;
    println!("Checking {} news feeds...", news.sources().len());
    let summary = news.tick(article_dispatcher.as_ref()).await;
    print_summary(&summary);

    Ok(())
}

fn print_summary(summary: &TickSummary) {
    println!(
        "  {} emitted, {} dispatch failures, {} sources failed",
        summary.emitted, summary.dispatch_failures, summary.failed_sources
    );
}
