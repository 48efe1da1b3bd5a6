use std::path::PathBuf;

use clap::{Args, ValueHint};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    timeframe::{value_parser_parse_timeframe, Timeframe},
    validators::directory::{validate_is_writable_directory, value_parser_parse_valid_directory},
};

#[derive(Debug, Clone, Serialize, Deserialize, Args, Validate)]
#[clap(next_help_heading = "Background task options")]
pub struct TaskConfig {
    /// Directory swept by the cleanup task.
    ///
    /// yt-dlp leaves cached player scripts in its working directory.
    #[arg(long, default_value = ".", env = "TUBE_RELAY_CLEANUP_DIR", value_hint = ValueHint::DirPath, value_parser = value_parser_parse_valid_directory())]
    #[validate(custom(function = "validate_is_writable_directory"))]
    pub cleanup_dir: PathBuf,

    /// Files in the cleanup directory ending with this suffix get deleted.
    #[arg(long, default_value = "-player-script.js", env = "TUBE_RELAY_CLEANUP_SUFFIX")]
    #[validate(length(min = 1))]
    pub cleanup_suffix: String,

    /// How often the cleanup task runs.
    #[arg(long, default_value = "1w", env = "TUBE_RELAY_CLEANUP_INTERVAL", value_parser = value_parser_parse_timeframe())]
    pub cleanup_interval: Timeframe,

    /// Disable the cleanup task.
    #[arg(long, env = "TUBE_RELAY_NO_CLEANUP")]
    pub no_cleanup: bool,

    /// How often to run `yt-dlp --update`.
    ///
    /// Not run at all if not set.
    #[arg(long, env = "TUBE_RELAY_YT_DLP_UPDATE_INTERVAL", value_parser = value_parser_parse_timeframe())]
    pub yt_dlp_update_interval: Option<Timeframe>,
}
impl TaskConfig {
    #[must_use]
    pub const fn cleanup_interval(&self) -> Option<Timeframe> {
        if self.no_cleanup {
            None
        } else {
            Some(self.cleanup_interval)
        }
    }
}
impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            cleanup_dir: PathBuf::from("."),
            cleanup_suffix: "-player-script.js".to_string(),
            cleanup_interval: Timeframe::Weeks(1),
            no_cleanup: false,
            yt_dlp_update_interval: None,
        }
    }
}
