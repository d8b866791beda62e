use chrono::{DateTime, Utc};
use feed_rs::parser;

use super::models::{FetchedFeed, Item};
use crate::{Error, Result};

/// Parse RSS/Atom feed content into the provider's latest items.
pub fn parse_feed(content: &[u8]) -> Result<FetchedFeed> {
    let feed = parser::parse(content).map_err(|e| Error::FeedParse(e.to_string()))?;

    let title = feed.title.map(|t| t.content);

    let items = feed
        .entries
        .into_iter()
        .map(|entry| {
            let url = entry.links.first().map(|l| l.href.clone());

            // feed-rs synthesizes an id when the feed lacks a guid; an empty
            // id still falls back to the entry link.
            let id = if entry.id.is_empty() {
                url.clone().unwrap_or_default()
            } else {
                entry.id
            };

            let title = entry
                .title
                .map(|t| t.content)
                .unwrap_or_else(|| "Untitled".to_string());

            let summary = entry
                .summary
                .map(|s| s.content)
                .or_else(|| entry.content.and_then(|c| c.body))
                .map(|s| html_to_text(&s));

            let published_at = entry
                .published
                .or(entry.updated)
                .map(DateTime::<Utc>::from);

            Item {
                id,
                title,
                url,
                summary,
                published_at,
            }
        })
        .collect();

    Ok(FetchedFeed { title, items })
}

/// Convert HTML content to plain text
fn html_to_text(html: &str) -> String {
    html2text::from_read(html.as_bytes(), 80)
        .map(|text| text.trim().to_string())
        .unwrap_or_else(|_| html.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS_SAMPLE: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Quantum Daily</title>
    <link>https://example.com</link>
    <item>
      <guid>article-1</guid>
      <title>Quantum leap in error correction</title>
      <link>https://example.com/article-1</link>
      <description>&lt;p&gt;Researchers demonstrate a &lt;b&gt;logical qubit&lt;/b&gt;.&lt;/p&gt;</description>
      <pubDate>Mon, 01 Jul 2024 10:00:00 GMT</pubDate>
    </item>
    <item>
      <title>No guid here</title>
      <link>https://example.com/article-2</link>
      <pubDate>Mon, 01 Jul 2024 12:00:00 GMT</pubDate>
    </item>
  </channel>
</rss>"#;

    const YOUTUBE_SAMPLE: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns:yt="http://www.youtube.com/xml/schemas/2015" xmlns="http://www.w3.org/2005/Atom">
  <title>Looking Glass Universe</title>
  <entry>
    <id>yt:video:dQw4w9WgXcQ</id>
    <yt:videoId>dQw4w9WgXcQ</yt:videoId>
    <title>What is a qubit really?</title>
    <link rel="alternate" href="https://www.youtube.com/watch?v=dQw4w9WgXcQ"/>
    <published>2024-07-01T09:00:00+00:00</published>
    <updated>2024-07-01T09:30:00+00:00</updated>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_rss_feed() {
        let fetched = parse_feed(RSS_SAMPLE).unwrap();

        assert_eq!(fetched.title.as_deref(), Some("Quantum Daily"));
        assert_eq!(fetched.items.len(), 2);

        let first = &fetched.items[0];
        assert_eq!(first.id, "article-1");
        assert_eq!(first.title, "Quantum leap in error correction");
        assert_eq!(first.url.as_deref(), Some("https://example.com/article-1"));
        assert!(first.published_at.is_some());

        // HTML stripped from the summary
        let summary = first.summary.as_deref().unwrap();
        assert!(summary.contains("logical qubit"));
        assert!(!summary.contains("<b>"));
    }

    #[test]
    fn test_parse_entry_without_guid_gets_stable_id() {
        let fetched = parse_feed(RSS_SAMPLE).unwrap();
        let second = &fetched.items[1];

        assert!(!second.id.is_empty());

        // Parsing the same content again must yield the same id
        let again = parse_feed(RSS_SAMPLE).unwrap();
        assert_eq!(second.id, again.items[1].id);
    }

    #[test]
    fn test_parse_youtube_atom_feed() {
        let fetched = parse_feed(YOUTUBE_SAMPLE).unwrap();

        assert_eq!(fetched.title.as_deref(), Some("Looking Glass Universe"));
        assert_eq!(fetched.items.len(), 1);

        let video = &fetched.items[0];
        assert_eq!(video.id, "yt:video:dQw4w9WgXcQ");
        assert_eq!(video.title, "What is a qubit really?");
        assert_eq!(
            video.url.as_deref(),
            Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
        );
        assert!(video.published_at.is_some());
    }

    #[test]
    fn test_parse_malformed_content_fails() {
        let err = parse_feed(b"this is not a feed").unwrap_err();
        assert!(matches!(err, Error::FeedParse(_)));
    }
}
