use std::{env::consts::OS, path::PathBuf, time::Duration};

use serde::Serialize;

use crate::{
    relay::Relay,
    tool::{run_to_end, Invocation, ProcessOutput},
};

const VERSION_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolVersionReport {
    pub path: String,
    pub version: String,
    pub error: String,
    pub platform: &'static str,
    pub code: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolPresence {
    pub path: String,
    pub exists: bool,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CookiesPresence {
    pub path: String,
    pub exists: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsReport {
    pub status: &'static str,
    pub platform: &'static str,
    pub ffmpeg: String,
    pub yt_dlp: ToolPresence,
    pub cookies: CookiesPresence,
}

impl Relay {
    /// What `yt-dlp --version` has to say, failures included.
    pub async fn tool_version(&self) -> ToolVersionReport {
        let invocation = self.tool.version();
        let path = invocation.program().display().to_string();

        match run_to_end(&invocation, VERSION_TIMEOUT).await {
            Ok(output) => ToolVersionReport {
                path,
                version: output.stdout_lossy().trim().to_string(),
                error: output.stderr,
                platform: OS,
                code: output.status,
            },
            Err(e) => ToolVersionReport {
                path,
                version: String::new(),
                error: e.to_string(),
                platform: OS,
                code: None,
            },
        }
    }

    pub async fn diagnose(&self) -> DiagnosticsReport {
        let version = self.tool_version().await;
        let exists = version.code.is_some() || PathBuf::from(&version.path).is_file();
        let yt_dlp = ToolPresence {
            exists,
            version: if version.code == Some(0) {
                version.version
            } else {
                format!("Error: {}", version.error.trim())
            },
            path: version.path,
        };

        let cookies_path = self.tool.cookies_path();

        DiagnosticsReport {
            status: "online",
            platform: OS,
            ffmpeg: self.ffmpeg_version().await,
            yt_dlp,
            cookies: CookiesPresence {
                path: cookies_path.display().to_string(),
                exists: cookies_path.is_file(),
            },
        }
    }

    async fn ffmpeg_version(&self) -> String {
        let program = self
            .settings
            .ffmpeg_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("ffmpeg"));

        let mut invocation = Invocation::new(program);
        invocation.arg("-version");

        match run_to_end(&invocation, VERSION_TIMEOUT)
            .await
            .and_then(ProcessOutput::into_success)
        {
            Ok(output) => output
                .stdout_lossy()
                .lines()
                .next()
                .unwrap_or_default()
                .to_string(),
            Err(e) => format!("Error: {e}"),
        }
    }
}
