use app_relay::{mirror::MirrorLink, DownloadRequest, MediaKind};
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::server::{app_helpers::payload::MediaPayload, app_response::ApiError, AppState};

pub(super) async fn video(state: State<AppState>, payload: MediaPayload) -> Result<Response, ApiError> {
    stream(state, payload, MediaKind::Video).await
}

pub(super) async fn audio(state: State<AppState>, payload: MediaPayload) -> Result<Response, ApiError> {
    stream(state, payload, MediaKind::Audio).await
}

async fn stream(
    State(state): State<AppState>,
    payload: MediaPayload,
    kind: MediaKind,
) -> Result<Response, ApiError> {
    let req = DownloadRequest {
        url: payload.media_url()?,
        kind,
        quality: payload.quality(),
    };
    info!(url = %req.url, %kind, quality = ?req.quality, "Starting download");

    let download = state.relay.download(&req).await?;

    let content_type = HeaderValue::from_static(download.content_type());
    let content_disposition = HeaderValue::from_str(&download.content_disposition())
        .map_err(|e| ApiError::internal("Download failed").with_details(e.to_string()))?;

    info!(
        title = ?download.title,
        strategy = ?download.strategy,
        tried = ?download.tried,
        pid = ?download.stream.pid(),
        "Streaming to client"
    );

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, content_disposition),
        ],
        Body::from_stream(download.stream),
    )
        .into_response())
}

pub(super) async fn video_mirror(
    state: State<AppState>,
    payload: MediaPayload,
) -> Result<Json<MirrorLink>, ApiError> {
    mirror(state, payload, MediaKind::Video)
}

pub(super) async fn audio_mirror(
    state: State<AppState>,
    payload: MediaPayload,
) -> Result<Json<MirrorLink>, ApiError> {
    mirror(state, payload, MediaKind::Audio)
}

fn mirror(
    State(state): State<AppState>,
    payload: MediaPayload,
    kind: MediaKind,
) -> Result<Json<MirrorLink>, ApiError> {
    let url = payload.media_url()?;

    Ok(Json(state.relay.mirror_link(&url, kind)?))
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::server::test_support::{json_body, offline_router, post_json, send};

    #[tokio::test]
    async fn mirror_link_for_video() {
        let (_dir, router) = offline_router();

        let res = send(
            router,
            post_json(
                "/api/download/video-simple",
                &json!({ "url": "https://youtu.be/dQw4w9WgXcQ" }),
            ),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            json_body(res).await,
            json!({
                "message": "Direct download link generated",
                "downloadUrl": "https://www.yewtu.be/watch?v=dQw4w9WgXcQ",
                "note": "Open this link in browser to download video",
            })
        );
    }

    #[tokio::test]
    async fn mirror_link_needs_a_video_id() {
        let (_dir, router) = offline_router();

        let res = send(
            router,
            post_json(
                "/api/download/audio-simple",
                &json!({ "url": "https://vimeo.com/123" }),
            ),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(res).await["error"], "Invalid YouTube URL");
    }

    #[cfg(unix)]
    mod with_tool {
        use app_helpers::temp_dir::TempDir;
        use axum::http::header;

        use super::*;
        use crate::server::test_support::{fake_yt_dlp, router, settings};

        const URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

        const YT_DLP: &str = r#"
case "$1" in
  --dump-json) echo '{"title":"Never: gonna?","thumbnail":"","duration":1,"uploader":"x","formats":[]}' ;;
  *) printf 'FAKEMEDIA' ;;
esac
"#;

        #[tokio::test]
        async fn download_streams_the_tool_output() {
            let dir = TempDir::with_prefix("tube-relay-test-").expect("temp dir");
            let tool = fake_yt_dlp(&dir, YT_DLP);

            let res = send(
                router(settings(&dir, tool)),
                post_json("/api/download/audio", &json!({ "url": URL })),
            )
            .await;

            assert_eq!(res.status(), StatusCode::OK);
            assert_eq!(
                res.headers()
                    .get(header::CONTENT_TYPE)
                    .and_then(|x| x.to_str().ok()),
                Some("audio/mpeg")
            );
            let disposition = res
                .headers()
                .get(header::CONTENT_DISPOSITION)
                .and_then(|x| x.to_str().ok())
                .unwrap_or_default()
                .to_string();
            assert!(disposition.starts_with("attachment; filename=\""));
            assert!(disposition.ends_with(".mp3\""));

            let body = axum::body::to_bytes(res.into_body(), usize::MAX)
                .await
                .expect("body");
            assert_eq!(&body[..], b"FAKEMEDIA");
        }

        #[tokio::test]
        async fn blocked_title_is_an_initialization_failure() {
            let dir = TempDir::with_prefix("tube-relay-test-").expect("temp dir");
            let tool = fake_yt_dlp(&dir, "echo 'ERROR: HTTP Error 403: Forbidden' >&2; exit 1");

            let res = send(
                router(settings(&dir, tool)),
                post_json(
                    "/api/download/video",
                    &json!({ "url": "https://vimeo.com/76979871" }),
                ),
            )
            .await;

            assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let body = json_body(res).await;
            assert_eq!(body["error"], "Download initialization failed");
            assert_eq!(body["methods"].as_array().map(Vec::len), Some(4));
        }

        #[tokio::test]
        async fn failed_download_reports_methods() {
            let dir = TempDir::with_prefix("tube-relay-test-").expect("temp dir");
            let tool = fake_yt_dlp(
                &dir,
                r#"
case "$1" in
  --dump-json) echo '{"title":"t","thumbnail":"","duration":1,"uploader":"x","formats":[]}' ;;
  *) echo 'ERROR: unable to download video data: HTTP Error 403: Forbidden' >&2; exit 1 ;;
esac
"#,
            );

            let res = send(
                router(settings(&dir, tool)),
                post_json("/api/download/video", &json!({ "url": URL })),
            )
            .await;

            assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let body = json_body(res).await;
            assert_eq!(body["error"], "Download failed");
            assert_eq!(
                body["methods"],
                json!(["with cookies", "without cookies", "different UA"])
            );
        }
    }
}
