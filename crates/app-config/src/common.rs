use std::path::{Path, PathBuf};

use clap::{Args, CommandFactory, ValueEnum, ValueHint};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::{
    cli::CliArgs,
    validators::url::{validate_is_absolute_url, value_parser_parse_base_url},
    APPLICATION_NAME,
};

pub const DEFAULT_YT_DLP_PROGRAM: &str = "yt-dlp";

#[derive(Debug, Clone, Default, Serialize, Deserialize, Args, Validate)]
#[allow(clippy::struct_field_names)]
#[clap(next_help_heading = Some("Program paths"))]
pub struct ProgramPathConfig {
    /// Path to the yt-dlp executable.
    ///
    /// If not provided, yt-dlp will be searched for in $PATH
    #[arg(long, default_value = None, env = "YT_DLP_PATH", value_hint = ValueHint::FilePath, value_parser = value_parser_program_path())]
    yt_dlp_path: Option<PathBuf>,

    /// Path to the ffmpeg executable.
    ///
    /// Only used for diagnostics. yt-dlp finds ffmpeg on its own.
    #[arg(long, default_value = None, env = "TUBE_RELAY_FFMPEG", value_hint = ValueHint::FilePath, value_parser = value_parser_program_path())]
    ffmpeg_path: Option<PathBuf>,
}
impl ProgramPathConfig {
    /// The yt-dlp program to spawn.
    ///
    /// Falls back to the bare program name so a missing binary
    /// surfaces as a spawn error on the first request instead of at startup.
    #[must_use]
    pub fn yt_dlp_path(&self) -> PathBuf {
        self.yt_dlp_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_YT_DLP_PROGRAM))
    }

    #[must_use]
    pub fn ffmpeg_path(&self) -> Option<&Path> {
        self.ffmpeg_path.as_deref()
    }

    #[must_use]
    pub fn resolve_paths(mut self) -> Self {
        self.yt_dlp_path = self
            .yt_dlp_path
            .or_else(|| which::which(DEFAULT_YT_DLP_PROGRAM).ok());
        self.ffmpeg_path = self.ffmpeg_path.or_else(|| which::which("ffmpeg").ok());

        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Args, Validate)]
#[clap(next_help_heading = Some("External endpoints/APIs"))]
pub struct EndpointConfig {
    /// The base URL of the noembed API used as the metadata fallback.
    #[arg(long = "noembed-url", default_value = "https://noembed.com", env = "TUBE_RELAY_NOEMBED_URL", value_hint = ValueHint::Url, value_parser = value_parser_parse_base_url())]
    #[validate(custom(function = "validate_is_absolute_url"))]
    pub noembed_base_url: String,

    /// The base URL of the frontend mirror used for direct download links.
    #[arg(long = "mirror-url", default_value = "https://www.yewtu.be", env = "TUBE_RELAY_MIRROR_URL", value_hint = ValueHint::Url, value_parser = value_parser_parse_base_url())]
    #[validate(custom(function = "validate_is_absolute_url"))]
    pub mirror_base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ValueEnum)]
pub enum DumpConfigType {
    Json,
    Toml,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Args, Validate)]
#[allow(clippy::option_option)]
#[clap(next_help_heading = Some("Run options"))]
pub struct RunConfig {
    /// Dump the config to stdout
    #[arg(long, value_enum, default_value = None)]
    pub dump_config: Option<Option<DumpConfigType>>,

    /// Dump shell completions to stdout
    #[arg(long, default_value = None, value_name = "SHELL", value_parser = hacky_dump_completions())]
    #[serde(skip)]
    pub dump_completions: Option<Shell>,
}

/// An existing file, or a program name looked up in `$PATH`.
fn resolve_program(s: &str) -> Result<PathBuf, &'static str> {
    let path = Path::new(s);

    if path.is_file() {
        return Ok(path.to_path_buf());
    }

    if path.exists() {
        return Err("Path is not a valid file");
    }

    which::which(s).map_err(|_| "Program not found (neither a file nor in $PATH)")
}

#[must_use]
pub fn value_parser_program_path() -> impl clap::builder::TypedValueParser {
    move |s: &str| resolve_program(s)
}

#[must_use]
pub fn hacky_dump_completions() -> impl clap::builder::TypedValueParser {
    move |s: &str| {
        let parsed = Shell::from_str(s, true);

        if let Ok(shell) = &parsed {
            clap_complete::generate(
                *shell,
                &mut CliArgs::command(),
                APPLICATION_NAME,
                &mut std::io::stdout(),
            );
            std::process::exit(0);
        }

        parsed.map_err(|_| ValidationError::new("Invalid shell"))
    }
}
