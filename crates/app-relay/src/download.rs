use std::fmt;

use app_helpers::file_name::attachment_file_name;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    chain::FallbackChain,
    error::RelayError,
    metadata::MetadataProvider,
    relay::Relay,
    request::MediaUrl,
    tool::{spawn_stream, ProcessStream},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
}
impl MediaKind {
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Video => "video/mp4",
            Self::Audio => "audio/mpeg",
        }
    }

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Video => "mp4",
            Self::Audio => "mp3",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Audio => write!(f, "audio"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub url: MediaUrl,
    pub kind: MediaKind,
    pub quality: Option<String>,
}

/// A download whose process already produced output.
#[derive(Debug)]
pub struct Download {
    pub title: String,
    pub file_name: String,
    pub kind: MediaKind,
    pub strategy: String,
    pub tried: Vec<String>,
    pub stream: ProcessStream,
}
impl Download {
    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        self.kind.content_type()
    }

    #[must_use]
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.file_name)
    }
}

impl Relay {
    /// Title for the attachment name. Falls back to noembed when yt-dlp can't answer.
    pub async fn resolve_title(&self, url: &MediaUrl) -> Result<String, RelayError> {
        let chain = FallbackChain::new("title", self.title_providers(url))
            .with_delay(self.settings.strategy_delay);

        let res = chain
            .run(|provider| provider.fetch(url.as_str()))
            .await
            .map_err(RelayError::TitleUnavailable)?;

        Ok(res.value.title)
    }

    #[tracing::instrument(skip_all, fields(url = %req.url, kind = %req.kind))]
    pub async fn download(&self, req: &DownloadRequest) -> Result<Download, RelayError> {
        let title = self.resolve_title(&req.url).await?;
        let file_name = attachment_file_name(&title, req.kind.extension());

        let timeout = self.settings.download_timeout;
        let chain = FallbackChain::new("download", &self.settings.download_strategies)
            .with_delay(self.settings.strategy_delay);

        let res = chain
            .run(|strategy| {
                let invocation = self.tool.download(
                    strategy,
                    req.url.as_str(),
                    req.kind,
                    req.quality.as_deref(),
                );

                async move { spawn_stream(&invocation, timeout).await }
            })
            .await
            .map_err(RelayError::Download)?;

        info!(strategy = res.strategy.name, %file_name, "Streaming download");

        Ok(Download {
            title,
            file_name,
            kind: req.kind,
            strategy: res.strategy.name.to_string(),
            tried: res.tried,
            stream: res.value,
        })
    }
}
