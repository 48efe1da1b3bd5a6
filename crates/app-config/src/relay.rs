use std::path::PathBuf;

use clap::{Args, ValueHint};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::timeframe::{value_parser_parse_timeframe, Timeframe};

#[cfg(windows)]
pub const DEFAULT_COOKIES_PATH: &str = "cookies.txt";
#[cfg(not(windows))]
pub const DEFAULT_COOKIES_PATH: &str = "/etc/secrets/cookies.txt";

#[derive(Debug, Clone, Serialize, Deserialize, Args, Validate)]
#[clap(next_help_heading = "Relay options")]
pub struct RelayConfig {
    /// Netscape format cookies file passed to yt-dlp.
    ///
    /// Strategies that use cookies quietly run without them
    /// when the file does not exist.
    #[arg(long, default_value = DEFAULT_COOKIES_PATH, env = "COOKIES_PATH", value_hint = ValueHint::FilePath)]
    pub cookies_path: PathBuf,

    /// Wall-clock limit for a single download attempt, streaming included.
    #[arg(long, default_value = "5min", env = "TUBE_RELAY_DOWNLOAD_TIMEOUT", value_parser = value_parser_parse_timeframe())]
    pub download_timeout: Timeframe,

    /// Limit for a single metadata lookup attempt.
    #[arg(long, default_value = "2min", env = "TUBE_RELAY_METADATA_TIMEOUT", value_parser = value_parser_parse_timeframe())]
    pub metadata_timeout: Timeframe,

    /// Pause between two consecutive strategies of a fallback chain.
    #[arg(long, default_value = "1s", env = "TUBE_RELAY_STRATEGY_DELAY", value_parser = value_parser_parse_timeframe())]
    pub strategy_delay: Timeframe,
}
impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            cookies_path: PathBuf::from(DEFAULT_COOKIES_PATH),
            download_timeout: Timeframe::Minutes(5),
            metadata_timeout: Timeframe::Minutes(2),
            strategy_delay: Timeframe::Seconds(1),
        }
    }
}
