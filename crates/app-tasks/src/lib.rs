use app_logger::error;

pub(crate) mod cron;

pub use cron::tasks::cleanup::{delete_files_with_suffix, CleanupReport};
pub use cron::tasks::yt_dlp::update_yt_dlp;

pub async fn start() {
    if let Err(e) = tokio::task::spawn_blocking(cron::spawn).await {
        error!("Failed to spawn cron tasks: {e:?}");
    }
}
