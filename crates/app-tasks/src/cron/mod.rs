use std::{future::Future, time::Duration};

use app_config::{task::TaskConfig, Config};
use app_logger::{debug, error, info};
use app_relay::tool::ToolConfig;
use tokio::task::JoinHandle;
use tracing::{info_span, Instrument, Span};

pub mod tasks;

#[tracing::instrument(name = "cron", skip_all)]
pub fn spawn() {
    let config = Config::global();
    let tool = ToolConfig::new(
        config.dependency_paths.yt_dlp_path(),
        &config.relay.cookies_path,
    );

    spawn_with(&config.task, tool);
}

pub fn spawn_with(task_config: &TaskConfig, tool: ToolConfig) -> Vec<JoinHandle<()>> {
    info!("Spawning cron tasks");

    let span = info_span!("tasks");
    let _span = span.enter();
    let mut handles = Vec::new();

    if let Some(interval) = task_config.cleanup_interval() {
        let dir = task_config.cleanup_dir.clone();
        let suffix = task_config.cleanup_suffix.clone();
        debug!(%interval, ?dir, %suffix, "Spawning cleanup task");

        handles.push(every(interval.into(), "cleanup", move || {
            let dir = dir.clone();
            let suffix = suffix.clone();

            async move {
                tasks::cleanup::delete_files_with_suffix(&dir, &suffix).await?;
                Ok(())
            }
        }));
    }

    if let Some(interval) = task_config.yt_dlp_update_interval {
        debug!(%interval, "Spawning yt-dlp update task");

        handles.push(every(interval.into(), "yt-dlp update", move || {
            let tool = tool.clone();

            async move { tasks::yt_dlp::update_yt_dlp(&tool).await }
        }));
    }

    handles
}

/// Run `task` every `interval`, first run after one interval.
fn every<F, Fut>(interval: Duration, name: &'static str, mut task: F) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send,
{
    tokio::task::spawn(
        async move {
            loop {
                tokio::time::sleep(interval).await;

                if let Err(e) = task().await {
                    error!(task = name, "Task failed: {e:?}");
                }
            }
        }
        .instrument(Span::current()),
    )
}
