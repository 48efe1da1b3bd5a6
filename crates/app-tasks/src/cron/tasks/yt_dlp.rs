use std::time::Duration;

use app_relay::tool::{run_to_end, ToolConfig};
use tracing::{debug, info, trace};

const UPDATE_TIMEOUT: Duration = Duration::from_secs(5 * 60);

#[tracing::instrument(skip_all, fields(program = %tool.program.display()))]
pub async fn update_yt_dlp(tool: &ToolConfig) -> anyhow::Result<()> {
    debug!("Checking for yt-dlp updates");
    let invocation = tool.update();

    trace!(?invocation, "Updating yt-dlp");

    let res = run_to_end(&invocation, UPDATE_TIMEOUT).await?;

    trace!(?res, "yt-dlp update result");

    if !res.success {
        anyhow::bail!("yt-dlp update failed: {output}", output = res.stderr.trim());
    }

    info!(output = %res.stdout_lossy().trim(), "yt-dlp update finished");

    Ok(())
}

#[cfg(all(test, unix))]
mod test {
    use app_helpers::temp_dir::TempDir;

    use super::*;

    fn tool(dir: &TempDir, body: &str) -> ToolConfig {
        let path = dir
            .write_executable("yt-dlp", &format!("#!/bin/sh\n{body}\n"))
            .expect("write fake yt-dlp");

        ToolConfig::new(path, dir.path().join("cookies.txt"))
    }

    #[tokio::test]
    async fn runs_self_update() {
        let dir = TempDir::with_prefix("app-tasks-test-").expect("create temp dir");
        let tool = tool(
            &dir,
            r#"[ "$1" = "--ignore-config" ] && [ "$2" = "--update" ] || exit 2
echo "yt-dlp is up to date (stable@2024.08.06)""#,
        );

        update_yt_dlp(&tool).await.expect("update");
    }

    #[tokio::test]
    async fn failed_update_carries_stderr() {
        let dir = TempDir::with_prefix("app-tasks-test-").expect("create temp dir");
        let tool = tool(
            &dir,
            "echo 'ERROR: You installed yt-dlp with pip' >&2; exit 1",
        );

        let err = update_yt_dlp(&tool).await.expect_err("should fail");

        assert_eq!(
            err.to_string(),
            "yt-dlp update failed: ERROR: You installed yt-dlp with pip"
        );
    }
}
