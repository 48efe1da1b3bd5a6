use std::sync::Arc;

use app_helpers::duration::parse_clock_duration;
use tracing::debug;

use crate::{
    chain::FallbackChain,
    error::RelayError,
    metadata::{MetadataProvider, Noembed, ProviderEntry, UniversalInfo, VideoInfo, YtDlpMetadata},
    request::MediaUrl,
    settings::RelaySettings,
    strategy::WITHOUT_COOKIES,
    tool::{run_to_end, ProcessOutput, ToolConfig},
};

/// Entry point for every lookup and download.
#[derive(Debug)]
pub struct Relay {
    pub(crate) settings: RelaySettings,
    pub(crate) tool: ToolConfig,
    pub(crate) noembed: Noembed,
    metadata_providers: Vec<ProviderEntry>,
    /// The metadata chain with noembed as the last resort.
    title_providers: Vec<ProviderEntry>,
}
impl Relay {
    pub fn new(settings: RelaySettings) -> Result<Self, RelayError> {
        let tool = ToolConfig::new(&settings.yt_dlp_path, &settings.cookies_path);
        let noembed = Noembed::new(&settings.noembed_base_url)?;

        let metadata_providers = settings
            .metadata_strategies
            .iter()
            .map(|strategy| {
                Arc::new(YtDlpMetadata::new(
                    tool.clone(),
                    strategy.clone(),
                    settings.metadata_timeout,
                )) as ProviderEntry
            })
            .collect::<Vec<_>>();

        let mut title_providers = metadata_providers.clone();
        title_providers.push(Arc::new(noembed.clone()));

        Ok(Self {
            settings,
            tool,
            noembed,
            metadata_providers,
            title_providers,
        })
    }

    /// Providers that can name the video at `url`.
    ///
    /// noembed only knows YouTube, anything else stays with yt-dlp.
    pub(crate) fn title_providers(&self, url: &MediaUrl) -> &[ProviderEntry] {
        if url.youtube_id().is_ok() {
            &self.title_providers
        } else {
            &self.metadata_providers
        }
    }

    /// Detailed metadata from yt-dlp, trying every metadata strategy.
    pub async fn info(&self, url: &MediaUrl) -> Result<VideoInfo, RelayError> {
        let chain = FallbackChain::new("metadata", &self.metadata_providers)
            .with_delay(self.settings.strategy_delay);

        let res = chain
            .run(|provider| provider.fetch(url.as_str()))
            .await
            .map_err(RelayError::Metadata)?;

        Ok(res.value)
    }

    /// Basic metadata from noembed alone.
    pub async fn info_noembed(&self, url: &MediaUrl) -> Result<VideoInfo, RelayError> {
        Ok(self.noembed.fetch(url.as_str()).await?)
    }

    /// Noembed first, then yt-dlp for the details noembed can't provide.
    ///
    /// A failing yt-dlp chain degrades the answer instead of failing it.
    pub async fn info_universal(&self, url: &MediaUrl) -> Result<UniversalInfo, RelayError> {
        let basic = self.info_noembed(url).await?;

        match self.info(url).await {
            Ok(detailed) => Ok(UniversalInfo::merged(detailed, basic)),
            Err(e) => {
                debug!(err = %e, "yt-dlp lookup failed, answering with noembed info");
                let duration = self.duration(url).await;

                Ok(UniversalInfo::limited(basic, duration, e.to_string()))
            }
        }
    }

    /// Best effort `--get-duration` lookup.
    pub async fn duration(&self, url: &MediaUrl) -> Option<u64> {
        let invocation = self.tool.duration(&WITHOUT_COOKIES, url.as_str());

        let output = match run_to_end(&invocation, self.settings.metadata_timeout)
            .await
            .and_then(ProcessOutput::into_success)
        {
            Ok(x) => x,
            Err(e) => {
                debug!(err = %e, "Duration lookup failed");
                return None;
            }
        };

        parse_clock_duration(output.stdout_lossy().trim())
            .map_err(|e| debug!(err = %e, "Unparseable duration"))
            .ok()
    }
}

#[cfg(all(test, unix))]
mod test {
    use app_helpers::temp_dir::TempDir;

    use super::*;
    use crate::{
        metadata::LIMITED_INFO_WARNING,
        test_support::{fake_noembed, fake_tool, serve, settings, YT_DLP_REJECTING_COOKIES},
    };

    fn url() -> MediaUrl {
        MediaUrl::parse("https://www.youtube.com/watch?v=dQw4w9WgXcQ").expect("url")
    }

    #[tokio::test]
    async fn info_falls_back_past_rejected_cookies() {
        let dir = TempDir::with_prefix("app-relay-test-").expect("create temp dir");
        let yt_dlp = fake_tool(&dir, "yt-dlp", YT_DLP_REJECTING_COOKIES);
        dir.write_file("cookies.txt", "# Netscape HTTP Cookie File\n")
            .expect("write cookies");
        let relay = Relay::new(settings(&dir, yt_dlp)).expect("relay");

        let info = relay.info(&url()).await.expect("info");

        assert_eq!(info.method, "without cookies");
        assert_eq!(info.title, "Fake: video!");
        assert_eq!(info.duration, Some(61));
        assert_eq!(info.author, "Uploader");
    }

    #[tokio::test]
    async fn unavailable_video_stops_the_chain() {
        let dir = TempDir::with_prefix("app-relay-test-").expect("create temp dir");
        let yt_dlp = fake_tool(
            &dir,
            "yt-dlp",
            "echo 'ERROR: [youtube] dQw4w9WgXcQ: Video unavailable' >&2; exit 1",
        );
        let relay = Relay::new(settings(&dir, yt_dlp)).expect("relay");

        let err = relay.info(&url()).await.expect_err("should fail");

        assert!(err.is_fatal());
        assert_eq!(err.chain().expect("chain error").tried, ["with cookies"]);
    }

    #[tokio::test]
    async fn exhausted_chain_lists_every_strategy() {
        let dir = TempDir::with_prefix("app-relay-test-").expect("create temp dir");
        let yt_dlp = fake_tool(
            &dir,
            "yt-dlp",
            "echo 'ERROR: HTTP Error 429: Too Many Requests' >&2; exit 1",
        );
        let relay = Relay::new(settings(&dir, yt_dlp)).expect("relay");

        let err = relay.info(&url()).await.expect_err("should fail");
        let chain = err.chain().expect("chain error");

        assert!(!err.is_fatal());
        assert_eq!(
            chain.tried,
            ["with cookies", "without cookies", "different UA", "mobile UA"]
        );
        assert!(chain.reason().contains("429"), "{}", chain.reason());
    }

    #[tokio::test]
    async fn universal_merges_when_yt_dlp_answers() {
        let dir = TempDir::with_prefix("app-relay-test-").expect("create temp dir");
        let yt_dlp = fake_tool(&dir, "yt-dlp", YT_DLP_REJECTING_COOKIES);
        let mut settings = settings(&dir, yt_dlp);
        settings.noembed_base_url = serve(fake_noembed("Noembed title")).await;
        let relay = Relay::new(settings).expect("relay");

        let info = relay.info_universal(&url()).await.expect("info");

        // No cookies file, so the cookies strategy runs without them and succeeds.
        assert_eq!(info.info.method, "with cookies");
        assert_eq!(info.info.title, "Fake: video!");
        assert_eq!(info.fallback_available, Some(true));
        assert_eq!(
            info.noembed_backup.map(|x| x.title).as_deref(),
            Some("Noembed title")
        );
        assert!(info.warning.is_none());
    }

    #[tokio::test]
    async fn universal_degrades_to_noembed_with_duration() {
        let dir = TempDir::with_prefix("app-relay-test-").expect("create temp dir");
        let yt_dlp = fake_tool(
            &dir,
            "yt-dlp",
            r#"case "$1" in
  --get-duration) echo "3:32" ;;
  *) echo "ERROR: [youtube] dQw4w9WgXcQ: Sign in to confirm you're not a bot" >&2; exit 1 ;;
esac"#,
        );
        let mut settings = settings(&dir, yt_dlp);
        settings.noembed_base_url = serve(fake_noembed("Noembed title")).await;
        let relay = Relay::new(settings).expect("relay");

        let info = relay.info_universal(&url()).await.expect("info");

        assert_eq!(info.info.method, "noembed");
        assert_eq!(info.info.title, "Noembed title");
        assert_eq!(info.info.duration, Some(212));
        assert_eq!(info.warning.as_deref(), Some(LIMITED_INFO_WARNING));
        assert!(info
            .yt_dlp_error
            .is_some_and(|x| x.contains("Sign in to confirm")));
    }

    #[tokio::test]
    async fn universal_needs_noembed() {
        let dir = TempDir::with_prefix("app-relay-test-").expect("create temp dir");
        let yt_dlp = fake_tool(&dir, "yt-dlp", YT_DLP_REJECTING_COOKIES);
        let relay = Relay::new(settings(&dir, yt_dlp)).expect("relay");

        let err = relay
            .info_universal(&MediaUrl::parse("https://vimeo.com/1").expect("url"))
            .await
            .expect_err("should fail");

        assert!(matches!(err, RelayError::InvalidYoutubeUrl), "{err:?}");
    }
}
