use std::time::Duration;

use app_helpers::video_id::youtube_video_id;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{MetadataProvider, ProviderError, VideoInfo};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_AUTHOR: &str = "Unknown Channel";

/// oEmbed lookups through noembed. Title, thumbnail and author only.
#[derive(Debug, Clone)]
pub struct Noembed {
    client: reqwest::Client,
    base_url: String,
}
impl Noembed {
    pub fn new<T: Into<String>>(base_url: T) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client<T: Into<String>>(client: reqwest::Client, base_url: T) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self { client, base_url }
    }
}

#[derive(Debug, Deserialize)]
struct NoembedResponse {
    title: Option<String>,
    thumbnail_url: Option<String>,
    author_name: Option<String>,
    error: Option<String>,
}

#[async_trait]
impl MetadataProvider for Noembed {
    fn name(&self) -> &str {
        "noembed"
    }

    async fn fetch(&self, url: &str) -> Result<VideoInfo, ProviderError> {
        let id = youtube_video_id(url).ok_or(ProviderError::InvalidUrl)?;
        let watch_url = format!("https://www.youtube.com/watch?v={id}");

        debug!(?id, "Fetching noembed info");

        let res = self
            .client
            .get(format!("{}/embed", self.base_url))
            .query(&[("url", watch_url.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json::<NoembedResponse>()
            .await?;

        if let Some(err) = res.error {
            return Err(ProviderError::Upstream(err));
        }

        Ok(VideoInfo {
            title: res.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            thumbnail: res.thumbnail_url.unwrap_or_default(),
            duration: None,
            author: res.author_name.unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            formats: serde_json::Value::Array(vec![]),
            method: self.name().to_string(),
        })
    }
}
