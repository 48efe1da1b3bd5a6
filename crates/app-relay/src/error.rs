use thiserror::Error;

use crate::{chain::ChainError, metadata::ProviderError};

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("YouTube URL is required")]
    MissingUrl,
    #[error("Invalid URL")]
    InvalidUrl,
    #[error("Invalid YouTube URL")]
    InvalidYoutubeUrl,
    #[error("{0}")]
    Metadata(#[source] ChainError),
    #[error("could not resolve the video title: {0}")]
    TitleUnavailable(#[source] ChainError),
    #[error("{0}")]
    Download(#[source] ChainError),
    #[error(transparent)]
    Noembed(ProviderError),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
impl RelayError {
    /// The chain that failed, if this error came out of one.
    #[must_use]
    pub const fn chain(&self) -> Option<&ChainError> {
        match self {
            Self::Metadata(e) | Self::TitleUnavailable(e) | Self::Download(e) => Some(e),
            _ => None,
        }
    }

    /// The input can never succeed, retrying is pointless.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.chain().is_some_and(|x| x.fatal)
    }
}

impl From<ProviderError> for RelayError {
    fn from(value: ProviderError) -> Self {
        match value {
            ProviderError::InvalidUrl => Self::InvalidYoutubeUrl,
            e => Self::Noembed(e),
        }
    }
}
