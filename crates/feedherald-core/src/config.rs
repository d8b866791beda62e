use std::env;

use crate::{Error, Result};

/// Runtime configuration for the bot, loaded from environment variables.
///
/// A `.env` file in the working directory is honored if present. Required
/// variables are `CHAT_URL` and `CHAT_TOKEN`; everything else has a
/// documented default.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Base URL of the chat channel API
    pub chat_url: String,
    /// Bearer token for the chat API
    pub chat_token: String,
    /// Destination channel name
    pub chat_channel: String,
    /// YouTube channel IDs to monitor
    pub youtube_channels: Vec<String>,
    /// News RSS/Atom feed URLs to monitor
    pub news_feeds: Vec<String>,
    /// Topical keywords for the news filter (case-insensitive substrings)
    pub news_keywords: Vec<String>,
    /// Seconds between YouTube polling ticks
    pub youtube_check_interval_secs: u64,
    /// Seconds between news polling ticks
    pub news_check_interval_secs: u64,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
}

impl BotConfig {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let chat_url = env::var("CHAT_URL")
            .map_err(|_| Error::MissingEnvVar("CHAT_URL".to_string()))?;
        let chat_token = env::var("CHAT_TOKEN")
            .map_err(|_| Error::MissingEnvVar("CHAT_TOKEN".to_string()))?;
        let chat_channel =
            env::var("CHAT_CHANNEL").unwrap_or_else(|_| default_chat_channel());

        let youtube_channels = env_list("YOUTUBE_CHANNELS")
            .unwrap_or_else(default_youtube_channels);
        let news_feeds = env_list("NEWS_FEEDS").unwrap_or_else(default_news_feeds);
        for feed in &news_feeds {
            url::Url::parse(feed)?;
        }
        let news_keywords =
            env_list("NEWS_KEYWORDS").unwrap_or_else(default_news_keywords);

        Ok(Self {
            chat_url,
            chat_token,
            chat_channel,
            youtube_channels,
            news_feeds,
            news_keywords,
            youtube_check_interval_secs: env_secs("YOUTUBE_CHECK_INTERVAL", 3600)?,
            news_check_interval_secs: env_secs("NEWS_CHECK_INTERVAL", 1800)?,
            request_timeout_secs: env_secs("REQUEST_TIMEOUT_SECS", 30)?,
        })
    }
}

/// Parse a comma-separated environment variable into a trimmed list.
/// Returns `None` when the variable is unset or contains no entries.
fn env_list(name: &str) -> Option<Vec<String>> {
    let raw = env::var(name).ok()?;
    let values: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

fn env_secs(name: &str, default: u64) -> Result<u64> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("{} must be a number of seconds", name))),
        Err(_) => Ok(default),
    }
}

fn default_chat_channel() -> String {
    "quantum-news".to_string()
}

/// YouTube channels covering quantum computing and adjacent physics content.
fn default_youtube_channels() -> Vec<String> {
    [
        "UCwlP-bPZmqpUuAi3L7q-FBw", // Looking Glass Universe
        "UC7_gcs09iThXybpVgjHZ_7g", // PBS Space Time
        "UCoxcjq-8xIDTYp3uz647V5A", // Numberphile
        "UCYO_jab_esuFRV4b17AJtAw", // 3Blue1Brown
        "UCkLHy_jxeaHTZCfGalg6QaA", // Minute Physics
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_news_feeds() -> Vec<String> {
    [
        "https://phys.org/rss-feed/search/?search=quantum+computing",
        "https://www.sciencedaily.com/rss/matter_energy/quantum_computing.xml",
        "https://quantumcomputingreport.com/feed/",
        "https://thequantuminsider.com/feed/",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_news_keywords() -> Vec<String> {
    [
        "quantum",
        "qubit",
        "qubits",
        "superposition",
        "entanglement",
        "quantum computer",
        "quantum computing",
        "quantum supremacy",
        "quantum advantage",
        "quantum processor",
        "quantum algorithm",
        "quantum cryptography",
        "quantum network",
        "quantum internet",
        "quantum simulation",
        "quantum error",
        "quantum gate",
        "ibm quantum",
        "google quantum",
        "d-wave",
        "ionq",
        "rigetti",
        "quantum machine learning",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Environment variables are process-global; serialize tests that touch them.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_bot_vars() {
        for name in [
            "CHAT_URL",
            "CHAT_TOKEN",
            "CHAT_CHANNEL",
            "YOUTUBE_CHANNELS",
            "NEWS_FEEDS",
            "NEWS_KEYWORDS",
            "YOUTUBE_CHECK_INTERVAL",
            "NEWS_CHECK_INTERVAL",
            "REQUEST_TIMEOUT_SECS",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    fn test_missing_required_vars() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_bot_vars();

        let err = BotConfig::from_env().unwrap_err();
        assert!(matches!(err, Error::MissingEnvVar(ref name) if name == "CHAT_URL"));
    }

    #[test]
    fn test_defaults_applied() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_bot_vars();
        env::set_var("CHAT_URL", "https://chat.example.com");
        env::set_var("CHAT_TOKEN", "secret");

        let config = BotConfig::from_env().unwrap();
        assert_eq!(config.chat_channel, "quantum-news");
        assert_eq!(config.youtube_channels.len(), 5);
        assert_eq!(config.news_feeds.len(), 4);
        assert!(config.news_keywords.contains(&"qubit".to_string()));
        assert_eq!(config.youtube_check_interval_secs, 3600);
        assert_eq!(config.news_check_interval_secs, 1800);

        clear_bot_vars();
    }

    #[test]
    fn test_list_parsing_trims_and_skips_empty() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_bot_vars();
        env::set_var("CHAT_URL", "https://chat.example.com");
        env::set_var("CHAT_TOKEN", "secret");
        env::set_var("NEWS_FEEDS", " https://a.example/feed , ,https://b.example/rss ");
        env::set_var("NEWS_CHECK_INTERVAL", "600");

        let config = BotConfig::from_env().unwrap();
        assert_eq!(
            config.news_feeds,
            vec!["https://a.example/feed", "https://b.example/rss"]
        );
        assert_eq!(config.news_check_interval_secs, 600);

        clear_bot_vars();
    }

    #[test]
    fn test_invalid_feed_url_rejected() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_bot_vars();
        env::set_var("CHAT_URL", "https://chat.example.com");
        env::set_var("CHAT_TOKEN", "secret");
        env::set_var("NEWS_FEEDS", "not a url");

        let err = BotConfig::from_env().unwrap_err();
        assert!(matches!(err, Error::UrlParse(_)));

        clear_bot_vars();
    }

    #[test]
    fn test_invalid_interval_rejected() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_bot_vars();
        env::set_var("CHAT_URL", "https://chat.example.com");
        env::set_var("CHAT_TOKEN", "secret");
        env::set_var("YOUTUBE_CHECK_INTERVAL", "soon");

        let err = BotConfig::from_env().unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        clear_bot_vars();
    }
}
