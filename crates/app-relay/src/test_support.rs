use std::{path::PathBuf, time::Duration};

use app_helpers::temp_dir::TempDir;

use crate::settings::RelaySettings;

/// Serve `router` on an ephemeral local port, returning its base URL.
pub async fn serve(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });

    format!("http://{addr}")
}

#[cfg(unix)]
pub fn fake_tool(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    dir.write_executable(name, &format!("#!/bin/sh\n{body}\n"))
        .expect("write fake tool")
}

/// Settings pointing at `yt_dlp`, with no delays and cookies expected in `dir`.
pub fn settings(dir: &TempDir, yt_dlp: PathBuf) -> RelaySettings {
    RelaySettings {
        yt_dlp_path: yt_dlp,
        ffmpeg_path: Some(dir.path().join("no-ffmpeg")),
        cookies_path: dir.path().join("cookies.txt"),
        noembed_base_url: "http://127.0.0.1:9".to_string(),
        download_timeout: Duration::from_secs(10),
        metadata_timeout: Duration::from_secs(10),
        strategy_delay: Duration::ZERO,
        ..RelaySettings::default()
    }
}

/// Answers like yt-dlp, except when cookies are passed: then it behaves
/// like an account that got flagged as a bot.
pub const YT_DLP_REJECTING_COOKIES: &str = r#"
for arg in "$@"; do
  if [ "$arg" = "--cookies" ]; then
    echo "ERROR: [youtube] dQw4w9WgXcQ: Sign in to confirm you're not a bot" >&2
    exit 1
  fi
done
case "$1" in
  --dump-json) echo '{"title":"Fake: video!","thumbnail":"https://i.ytimg.com/t.jpg","duration":61.5,"uploader":"Uploader","formats":[]}' ;;
  --get-duration) echo "1:01" ;;
  -o) printf 'FAKEMEDIA' ;;
  --version) echo "2024.08.06" ;;
esac
"#;

/// A noembed lookalike that knows a single video title.
pub fn fake_noembed(title: &'static str) -> axum::Router {
    use axum::{routing::get, Json};

    axum::Router::new().route(
        "/embed",
        get(move || async move {
            Json(serde_json::json!({
                "title": title,
                "thumbnail_url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg",
                "author_name": "Noembed Author",
            }))
        }),
    )
}
