mod invocation;
mod process;
mod stream;

use std::{
    io,
    path::{Path, PathBuf},
    time::Duration,
};

use thiserror::Error;

pub use invocation::Invocation;
pub use process::{run_to_end, ProcessOutput};
pub use stream::{spawn_stream, ProcessStream};

use crate::{
    chain::{classify_stderr, Classify, Outcome},
    download::MediaKind,
    strategy::Strategy,
};

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("`{program}` was not found. Is it installed?")]
    NotFound { program: String },
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("exited with code {status}: {stderr}", status = display_code(.code))]
    Failed { code: Option<i32>, stderr: String },
    #[error("finished without producing any output: {stderr}")]
    NoOutput { stderr: String },
    #[error("process {0} pipe was not captured")]
    MissingPipe(&'static str),
    #[error(transparent)]
    Io(#[from] io::Error),
}
impl ToolError {
    pub(crate) fn spawn(program: String, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound { program }
        } else {
            Self::Spawn { program, source }
        }
    }
}

fn display_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "unknown".to_string(), |x| x.to_string())
}

impl Classify for ToolError {
    fn outcome(&self) -> Outcome {
        match self {
            Self::NotFound { .. } => Outcome::Fatal,
            Self::Failed { stderr, .. } | Self::NoOutput { stderr } => classify_stderr(stderr),
            Self::Spawn { .. } | Self::Timeout(_) | Self::MissingPipe(_) | Self::Io(_) => {
                Outcome::Recoverable
            }
        }
    }
}

const DEFAULT_VIDEO_FORMAT: &str = "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best";
const AUDIO_FORMAT: &str = "bestaudio[ext=m4a]/bestaudio";

/// Builds yt-dlp invocations for a strategy.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    pub program: PathBuf,
    pub cookies_path: PathBuf,
}
impl ToolConfig {
    pub fn new<P: Into<PathBuf>, C: Into<PathBuf>>(program: P, cookies_path: C) -> Self {
        Self {
            program: program.into(),
            cookies_path: cookies_path.into(),
        }
    }

    /// Checked on every call so a cookies file can be added without a restart.
    #[must_use]
    pub fn cookies_available(&self) -> bool {
        self.cookies_path.is_file()
    }

    #[must_use]
    pub fn cookies_path(&self) -> &Path {
        &self.cookies_path
    }

    fn base(&self, strategy: &Strategy) -> Invocation {
        let mut inv = Invocation::new(&self.program);
        inv.args(["--no-playlist", "--no-check-certificate"])
            .arg("--user-agent")
            .arg(strategy.user_agent.as_str());

        if strategy.use_cookies && self.cookies_available() {
            inv.arg("--cookies").arg(&self.cookies_path);
        }

        inv
    }

    #[must_use]
    pub fn metadata(&self, strategy: &Strategy, url: &str) -> Invocation {
        let mut inv = Invocation::new(&self.program);
        inv.arg("--dump-json")
            .args(self.base(strategy).get_args())
            .args(["--", url]);

        inv
    }

    /// Duration lookup never sends cookies.
    #[must_use]
    pub fn duration(&self, strategy: &Strategy, url: &str) -> Invocation {
        let strategy = Strategy {
            use_cookies: false,
            ..strategy.clone()
        };

        let mut inv = Invocation::new(&self.program);
        inv.arg("--get-duration")
            .args(self.base(&strategy).get_args())
            .args(["--", url]);

        inv
    }

    #[must_use]
    pub fn download(
        &self,
        strategy: &Strategy,
        url: &str,
        kind: MediaKind,
        quality: Option<&str>,
    ) -> Invocation {
        let mut inv = Invocation::new(&self.program);
        inv.args(["-o", "-", "--no-playlist", "--no-check-certificate"]);

        match kind {
            MediaKind::Video => {
                inv.arg("-f")
                    .arg(video_format(quality))
                    .args(["--merge-output-format", "mp4"]);
            }
            MediaKind::Audio => {
                inv.args(["-f", AUDIO_FORMAT])
                    .args(["--extract-audio", "--audio-format", "mp3"])
                    .args(["--audio-quality", "0"]);
            }
        }

        inv.arg("--user-agent").arg(strategy.user_agent.as_str());
        if strategy.use_cookies && self.cookies_available() {
            inv.arg("--cookies").arg(&self.cookies_path);
        }
        inv.args(["--", url]);

        inv
    }

    #[must_use]
    pub fn version(&self) -> Invocation {
        let mut inv = Invocation::new(&self.program);
        inv.arg("--version");

        inv
    }

    #[must_use]
    pub fn update(&self) -> Invocation {
        let mut inv = Invocation::new(&self.program);
        inv.args(["--ignore-config", "--update"]);

        inv
    }
}

/// Format selector for a requested quality such as `720p`.
///
/// Anything that is not a plain height falls back to the best mp4.
#[must_use]
pub fn video_format(quality: Option<&str>) -> String {
    let height = quality
        .map(str::trim)
        .and_then(|x| x.strip_suffix('p'))
        .filter(|x| !x.is_empty() && x.chars().all(|c| c.is_ascii_digit()));

    match height {
        Some(h) => format!(
            "bestvideo[height<={h}][ext=mp4]+bestaudio[ext=m4a]/best[height<={h}][ext=mp4]/best[height<={h}]"
        ),
        None => DEFAULT_VIDEO_FORMAT.to_string(),
    }
}

#[cfg(test)]
mod test {
    use app_helpers::temp_dir::TempDir;

    use super::*;
    use crate::strategy::{MOBILE_USER_AGENT, WITHOUT_COOKIES, WITH_COOKIES};

    fn args(inv: &Invocation) -> Vec<String> {
        inv.get_args()
            .iter()
            .map(|x| x.to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn url_always_follows_double_dash() {
        let tool = ToolConfig::new("yt-dlp", "/nonexistent/cookies.txt");
        let url = "--exec=rm -rf /";

        for inv in [
            tool.metadata(&WITH_COOKIES, url),
            tool.duration(&WITH_COOKIES, url),
            tool.download(&WITH_COOKIES, url, MediaKind::Video, None),
            tool.download(&WITH_COOKIES, url, MediaKind::Audio, None),
        ] {
            let args = args(&inv);
            let n = args.len();

            assert_eq!(args[n - 2..], ["--", url], "{inv:?}");
        }
    }

    #[test]
    fn cookies_only_when_the_file_exists() {
        let dir = TempDir::with_prefix("app-relay-test-").expect("create temp dir");
        let missing = ToolConfig::new("yt-dlp", dir.path().join("cookies.txt"));
        assert!(!args(&missing.metadata(&WITH_COOKIES, "u")).contains(&"--cookies".to_string()));

        let cookies = dir.write_file("cookies.txt", "# Netscape HTTP Cookie File\n").expect("write");
        let present = ToolConfig::new("yt-dlp", &cookies);

        let with = args(&present.metadata(&WITH_COOKIES, "u"));
        let pos = with.iter().position(|x| x == "--cookies").expect("has --cookies");
        assert_eq!(with[pos + 1], cookies.to_string_lossy());

        assert!(!args(&present.metadata(&WITHOUT_COOKIES, "u")).contains(&"--cookies".to_string()));
        assert!(!args(&present.duration(&WITH_COOKIES, "u")).contains(&"--cookies".to_string()));
    }

    #[test]
    fn metadata_arguments() {
        let tool = ToolConfig::new("yt-dlp", "/nonexistent");

        assert_eq!(
            args(&tool.metadata(&MOBILE_USER_AGENT, "https://youtu.be/x")),
            [
                "--dump-json",
                "--no-playlist",
                "--no-check-certificate",
                "--user-agent",
                MOBILE_USER_AGENT.user_agent.as_str(),
                "--",
                "https://youtu.be/x",
            ]
        );
    }

    #[test]
    fn audio_download_extracts_mp3_to_stdout() {
        let tool = ToolConfig::new("yt-dlp", "/nonexistent");
        let args = args(&tool.download(&WITHOUT_COOKIES, "u", MediaKind::Audio, Some("720p")));

        assert_eq!(args[..2], ["-o", "-"]);
        for expected in ["--extract-audio", "mp3", AUDIO_FORMAT] {
            assert!(args.iter().any(|x| x == expected), "missing {expected}");
        }
        assert!(!args.iter().any(|x| x == "--merge-output-format"));
    }

    #[test]
    fn picks_video_format_from_quality() {
        assert_eq!(video_format(None), DEFAULT_VIDEO_FORMAT);
        assert_eq!(video_format(Some("auto")), DEFAULT_VIDEO_FORMAT);
        assert_eq!(video_format(Some("")), DEFAULT_VIDEO_FORMAT);
        assert_eq!(video_format(Some("p")), DEFAULT_VIDEO_FORMAT);
        assert_eq!(video_format(Some("72Op")), DEFAULT_VIDEO_FORMAT);
        assert_eq!(
            video_format(Some("720p")),
            "bestvideo[height<=720][ext=mp4]+bestaudio[ext=m4a]/best[height<=720][ext=mp4]/best[height<=720]"
        );
    }

    #[test]
    fn classifies_tool_errors() {
        assert_eq!(
            ToolError::spawn("yt-dlp".into(), io::ErrorKind::NotFound.into()).outcome(),
            Outcome::Fatal
        );
        assert_eq!(
            ToolError::Timeout(Duration::from_secs(1)).outcome(),
            Outcome::Recoverable
        );
        assert_eq!(
            ToolError::Failed {
                code: Some(1),
                stderr: "ERROR: [youtube] x: Video unavailable".into()
            }
            .outcome(),
            Outcome::Fatal
        );
        assert_eq!(
            ToolError::Failed {
                code: Some(1),
                stderr: "HTTP Error 429: Too Many Requests".into()
            }
            .to_string(),
            "exited with code 1: HTTP Error 429: Too Many Requests"
        );
    }
}
