use anyhow::Result;

use feedherald_core::BotConfig;

/// List the configured sources and polling intervals.
pub fn run(config: &BotConfig) -> Result<()> {
    println!(
        "YouTube channels ({}, every {}s):",
        config.youtube_channels.len(),
        config.youtube_check_interval_secs
    );
    for channel_id in &config.youtube_channels {
        println!("  {}", channel_id);
    }

    println!(
        "\nNews feeds ({}, every {}s):",
        config.news_feeds.len(),
        config.news_check_interval_secs
    );
    for url in &config.news_feeds {
        println!("  {}", url);
    }

    println!("\nNews keywords: {}", config.news_keywords.join(", "));
    println!("Posting to channel: {}", config.chat_channel);

    Ok(())
}
