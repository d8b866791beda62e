use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    pub id: i64,
    pub name: String,
    /// Fields the API returns that we don't interpret
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ChannelsResponse {
    channels: Vec<Channel>,
}

#[derive(Debug, Serialize)]
struct SendMessagePayload<'a> {
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateChannelPayload<'a> {
    name: &'a str,
}

/// Async client for the chat channel API: list channels, create channels,
/// and post messages by channel name. Authentication is a single bearer
/// token sent on every request.
pub struct ChatClient {
    url: String,
    client: Client,
}

impl ChatClient {
    pub fn new(url: &str, token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| Error::Config("chat token is not a valid header value".to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// List all available channels
    pub async fn list_channels(&self) -> Result<Vec<Channel>> {
        let response = self
            .client
            .get(format!("{}/channels", self.url))
            .send()
            .await?
            .error_for_status()?;

        let wrapper: ChannelsResponse = response.json().await?;
        Ok(wrapper.channels)
    }

    /// Find a channel ID by its name
    pub async fn find_channel_id_by_name(&self, name: &str) -> Result<Option<i64>> {
        let channels = self.list_channels().await?;
        Ok(channels.into_iter().find(|c| c.name == name).map(|c| c.id))
    }

    /// Create a new channel
    pub async fn create_channel(&self, name: &str) -> Result<Channel> {
        let response = self
            .client
            .post(format!("{}/channels/", self.url))
            .json(&CreateChannelPayload { name })
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    /// Send a message to a channel by name, creating the channel if it
    /// doesn't exist.
    pub async fn send_message(&self, channel_name: &str, content: &str) -> Result<()> {
        let channel_id = match self.find_channel_id_by_name(channel_name).await? {
            Some(id) => id,
            None => self.create_channel(channel_name).await?.id,
        };

        self.client
            .post(format!("{}/channels/{}/messages", self.url, channel_id))
            .json(&SendMessagePayload { content })
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
