use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{MetadataProvider, ProviderError, VideoInfo};
use crate::{
    strategy::Strategy,
    tool::{run_to_end, ToolConfig},
};

/// Metadata from `yt-dlp --dump-json` using one strategy.
#[derive(Debug, Clone)]
pub struct YtDlpMetadata {
    tool: ToolConfig,
    strategy: Strategy,
    timeout: Duration,
}
impl YtDlpMetadata {
    #[must_use]
    pub const fn new(tool: ToolConfig, strategy: Strategy, timeout: Duration) -> Self {
        Self {
            tool,
            strategy,
            timeout,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DumpedInfo {
    title: Option<String>,
    thumbnail: Option<String>,
    duration: Option<f64>,
    uploader: Option<String>,
    channel: Option<String>,
    #[serde(default)]
    formats: serde_json::Value,
}

#[async_trait]
impl MetadataProvider for YtDlpMetadata {
    fn name(&self) -> &str {
        self.strategy.name
    }

    async fn fetch(&self, url: &str) -> Result<VideoInfo, ProviderError> {
        let invocation = self.tool.metadata(&self.strategy, url);
        let output = run_to_end(&invocation, self.timeout)
            .await?
            .into_success()?;

        parse_dump(&output.stdout, self.strategy.name)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_dump(stdout: &[u8], method: &str) -> Result<VideoInfo, ProviderError> {
    // One JSON document per line; `--no-playlist` means we only care about the first.
    let info = serde_json::Deserializer::from_slice(stdout)
        .into_iter::<DumpedInfo>()
        .next()
        .ok_or(ProviderError::EmptyOutput)??;

    debug!(title = ?info.title, "Parsed yt-dlp info");

    Ok(VideoInfo {
        title: info.title.unwrap_or_default(),
        thumbnail: info.thumbnail.unwrap_or_default(),
        duration: info
            .duration
            .filter(|x| x.is_finite() && *x >= 0.0)
            .map(|x| x.floor() as u64),
        author: info.uploader.or(info.channel).unwrap_or_default(),
        formats: info.formats,
        method: method.to_string(),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_dump_json() {
        let stdout = br#"{"id":"abc","title":"A video","thumbnail":"https://i.ytimg.com/x.jpg","duration":212.9,"uploader":"Someone","formats":[{"format_id":"18"}]}
"#;

        let info = parse_dump(stdout, "without cookies").expect("parse");

        assert_eq!(info.title, "A video");
        assert_eq!(info.thumbnail, "https://i.ytimg.com/x.jpg");
        assert_eq!(info.duration, Some(212));
        assert_eq!(info.author, "Someone");
        assert_eq!(info.formats, serde_json::json!([{"format_id": "18"}]));
        assert_eq!(info.method, "without cookies");
    }

    #[test]
    fn falls_back_to_channel_and_tolerates_missing_fields() {
        let info = parse_dump(br#"{"channel":"Chan"}"#, "m").expect("parse");

        assert_eq!(info.author, "Chan");
        assert_eq!(info.duration, None);
        assert!(info.title.is_empty());
    }

    #[test]
    fn empty_or_garbage_output_fails() {
        assert!(matches!(
            parse_dump(b"  \n", "m"),
            Err(ProviderError::EmptyOutput)
        ));
        assert!(matches!(
            parse_dump(b"WARNING: not json", "m"),
            Err(ProviderError::Parse(_))
        ));
    }
}
