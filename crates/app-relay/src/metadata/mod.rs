mod noembed;
mod universal;
mod yt_dlp;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use noembed::Noembed;
pub use universal::{UniversalInfo, LIMITED_INFO_WARNING};
pub use yt_dlp::YtDlpMetadata;

use crate::{
    chain::{Classify, Named, Outcome},
    tool::ToolError,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInfo {
    pub title: String,
    pub thumbnail: String,
    pub duration: Option<u64>,
    pub author: String,
    #[serde(default)]
    pub formats: serde_json::Value,
    pub method: String,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error(transparent)]
    Tool(#[from] ToolError),
    #[error("failed to parse yt-dlp output: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("yt-dlp printed no video information")]
    EmptyOutput,
    #[error("Invalid YouTube URL")]
    InvalidUrl,
    #[error("Noembed failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Noembed failed: {0}")]
    Upstream(String),
}

impl Classify for ProviderError {
    fn outcome(&self) -> Outcome {
        match self {
            Self::Tool(e) => e.outcome(),
            Self::InvalidUrl => Outcome::Fatal,
            Self::Parse(_) | Self::EmptyOutput | Self::Http(_) | Self::Upstream(_) => {
                Outcome::Recoverable
            }
        }
    }
}

#[async_trait]
pub trait MetadataProvider: std::fmt::Debug + Send + Sync {
    /// Name reported to clients as the lookup method.
    fn name(&self) -> &str;

    async fn fetch(&self, url: &str) -> Result<VideoInfo, ProviderError>;
}

pub type ProviderEntry = Arc<dyn MetadataProvider>;

impl Named for ProviderEntry {
    fn name(&self) -> &str {
        self.as_ref().name()
    }
}
