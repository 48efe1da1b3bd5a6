use app_helpers::video_id::youtube_video_id;
use url::Url;

use crate::error::RelayError;

/// A client supplied URL that is safe to hand to the extraction tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUrl(Url);
impl MediaUrl {
    pub fn parse(input: &str) -> Result<Self, RelayError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(RelayError::MissingUrl);
        }

        let url = Url::parse(input).map_err(|_| RelayError::InvalidUrl)?;

        match (url.scheme(), url.host_str()) {
            ("http" | "https", Some(host)) if !host.is_empty() => Ok(Self(url)),
            _ => Err(RelayError::InvalidUrl),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn youtube_id(&self) -> Result<String, RelayError> {
        youtube_video_id(self.as_str()).ok_or(RelayError::InvalidYoutubeUrl)
    }
}

impl std::fmt::Display for MediaUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn accepts_web_urls() {
        let url = MediaUrl::parse("  https://youtu.be/dQw4w9WgXcQ ").expect("valid");

        assert_eq!(url.as_str(), "https://youtu.be/dQw4w9WgXcQ");
        assert_eq!(url.youtube_id().expect("id"), "dQw4w9WgXcQ");
    }

    #[test]
    fn rejects_blank_and_non_web_urls() {
        assert!(matches!(MediaUrl::parse("   "), Err(RelayError::MissingUrl)));

        for input in [
            "--exec rm",
            "file:///etc/passwd",
            "ftp://example.com/a",
            "youtube.com/watch?v=x",
        ] {
            assert!(
                matches!(MediaUrl::parse(input), Err(RelayError::InvalidUrl)),
                "{input}"
            );
        }
    }

    #[test]
    fn non_youtube_urls_have_no_id() {
        let url = MediaUrl::parse("https://vimeo.com/123").expect("valid");

        assert!(matches!(url.youtube_id(), Err(RelayError::InvalidYoutubeUrl)));
    }
}
