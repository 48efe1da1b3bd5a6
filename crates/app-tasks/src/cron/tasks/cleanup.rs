use std::path::Path;

use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub deleted: usize,
    pub failed: usize,
}

/// Delete the regular files directly inside `dir` whose name ends with `suffix`.
#[tracing::instrument(skip(suffix))]
pub async fn delete_files_with_suffix(dir: &Path, suffix: &str) -> anyhow::Result<CleanupReport> {
    debug!(%suffix, "Running cleanup");

    let mut report = CleanupReport::default();
    let mut entries = tokio::fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };

        if !name.ends_with(suffix) || !entry.file_type().await?.is_file() {
            continue;
        }

        match tokio::fs::remove_file(entry.path()).await {
            Ok(()) => {
                info!(file = %name, "Deleted file");
                report.deleted += 1;
            }
            Err(e) => {
                warn!(file = %name, err = ?e, "Failed to delete file");
                report.failed += 1;
            }
        }
    }

    if report.deleted == 0 && report.failed == 0 {
        info!("No files to clean up");
    } else {
        info!(deleted = report.deleted, failed = report.failed, "Cleanup finished");
    }

    Ok(report)
}
