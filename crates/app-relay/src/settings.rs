use std::{path::PathBuf, time::Duration};

use app_config::Config;

use crate::strategy::{self, Strategy};

/// Everything the relay needs, detached from the global config.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub yt_dlp_path: PathBuf,
    pub ffmpeg_path: Option<PathBuf>,
    pub cookies_path: PathBuf,
    pub noembed_base_url: String,
    pub mirror_base_url: String,
    pub download_timeout: Duration,
    pub metadata_timeout: Duration,
    pub strategy_delay: Duration,
    pub metadata_strategies: Vec<Strategy>,
    pub download_strategies: Vec<Strategy>,
}
impl RelaySettings {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            yt_dlp_path: config.dependency_paths.yt_dlp_path(),
            ffmpeg_path: config.dependency_paths.ffmpeg_path().map(PathBuf::from),
            cookies_path: config.relay.cookies_path.clone(),
            noembed_base_url: config.endpoint.noembed_base_url.clone(),
            mirror_base_url: config.endpoint.mirror_base_url.clone(),
            download_timeout: config.relay.download_timeout.into(),
            metadata_timeout: config.relay.metadata_timeout.into(),
            strategy_delay: config.relay.strategy_delay.into(),
            ..Self::default()
        }
    }
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            yt_dlp_path: PathBuf::from(app_config::common::DEFAULT_YT_DLP_PROGRAM),
            ffmpeg_path: None,
            cookies_path: PathBuf::from(app_config::relay::DEFAULT_COOKIES_PATH),
            noembed_base_url: "https://noembed.com".to_string(),
            mirror_base_url: "https://www.yewtu.be".to_string(),
            download_timeout: Duration::from_secs(5 * 60),
            metadata_timeout: Duration::from_secs(2 * 60),
            strategy_delay: Duration::from_secs(1),
            metadata_strategies: strategy::metadata_strategies(),
            download_strategies: strategy::download_strategies(),
        }
    }
}
