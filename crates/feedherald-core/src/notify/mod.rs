pub mod client;

pub use client::{Channel, ChatClient};

use async_trait::async_trait;

use crate::feed::Item;
use crate::Result;

const MAX_SUMMARY_CHARS: usize = 300;

/// How an emitted item is rendered: as a new-video alert or a news article.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStyle {
    Video,
    Article,
}

/// Delivers one formatted item to the destination channel. The watcher only
/// sees this trait; tests substitute recording implementations.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(&self, item: &Item, source_name: &str) -> Result<()>;
}

/// Production dispatcher posting to a fixed chat channel.
pub struct ChannelDispatcher {
    client: ChatClient,
    channel: String,
    style: MessageStyle,
}

impl ChannelDispatcher {
    pub fn new(client: ChatClient, channel: impl Into<String>, style: MessageStyle) -> Self {
        Self {
            client,
            channel: channel.into(),
            style,
        }
    }
}

#[async_trait]
impl Dispatcher for ChannelDispatcher {
    async fn dispatch(&self, item: &Item, source_name: &str) -> Result<()> {
        let message = format_message(self.style, item, source_name);
        self.client
            .send_message(&self.channel, &message)
            .await
            .map_err(|e| crate::Error::Dispatch(e.to_string()))?;

        tracing::info!("Posted {}: {}", source_name, item.title);
        Ok(())
    }
}

/// Render an item as a chat message.
pub fn format_message(style: MessageStyle, item: &Item, source_name: &str) -> String {
    match style {
        MessageStyle::Video => {
            let mut message = format!("New video from {}: {}", source_name, item.title);
            if let Some(url) = &item.url {
                message.push(' ');
                message.push_str(url);
            }
            message
        }
        MessageStyle::Article => {
            let mut message = format!("{} {}", source_name, item.title);
            if let Some(summary) = item.summary.as_deref().filter(|s| !s.is_empty()) {
                message.push_str(": ");
                message.push_str(&truncate_chars(summary, MAX_SUMMARY_CHARS));
            }
            if let Some(url) = &item.url {
                message.push(' ');
                message.push_str(url);
            }
            message
        }
    }
}

/// Truncate to at most `max_chars` characters on a char boundary, appending
/// an ellipsis when anything was cut.
fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, summary: Option<&str>, url: Option<&str>) -> Item {
        Item {
            id: "id-1".to_string(),
            title: title.to_string(),
            url: url.map(str::to_string),
            summary: summary.map(str::to_string),
            published_at: None,
        }
    }

    #[test]
    fn test_format_video_message() {
        let message = format_message(
            MessageStyle::Video,
            &item("What is a qubit?", None, Some("https://youtu.be/abc")),
            "Looking Glass Universe",
        );
        assert_eq!(
            message,
            "New video from Looking Glass Universe: What is a qubit? https://youtu.be/abc"
        );
    }

    #[test]
    fn test_format_article_message() {
        let message = format_message(
            MessageStyle::Article,
            &item(
                "Quantum leap",
                Some("A short summary."),
                Some("https://example.com/a"),
            ),
            "Quantum Daily",
        );
        assert_eq!(
            message,
            "Quantum Daily Quantum leap: A short summary. https://example.com/a"
        );
    }

    #[test]
    fn test_format_article_without_summary() {
        let message = format_message(
            MessageStyle::Article,
            &item("Quantum leap", Some(""), None),
            "Quantum Daily",
        );
        assert_eq!(message, "Quantum Daily Quantum leap");
    }

    #[test]
    fn test_long_summary_truncated_on_char_boundary() {
        let long = "é".repeat(400);
        let message = format_message(
            MessageStyle::Article,
            &item("Title", Some(&long), None),
            "Feed",
        );

        assert!(message.ends_with("..."));
        // 297 chars of summary + ellipsis
        let summary_part = message.split(": ").nth(1).unwrap();
        assert_eq!(summary_part.chars().count(), 300);
    }

    #[test]
    fn test_short_summary_not_truncated() {
        assert_eq!(truncate_chars("short", 300), "short");
    }
}
