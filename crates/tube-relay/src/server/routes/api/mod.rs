use axum::{routing::get, Router};

use super::post_only;
use crate::server::AppRouter;

mod debug;
mod download;
mod info;

pub(super) fn router() -> AppRouter {
    Router::new()
        .route("/info", post_only(info::info))
        .route("/info-universal", post_only(info::info_universal))
        .route("/info-fallback", post_only(info::info_noembed))
        .route("/info-simple", post_only(info::info_noembed))
        .route("/download/video", post_only(download::video))
        .route("/download/audio", post_only(download::audio))
        .route("/download/video-simple", post_only(download::video_mirror))
        .route("/download/audio-simple", post_only(download::audio_mirror))
        .route("/debug-yt", get(debug::tool_version))
        .route("/diag", get(debug::diagnostics))
}
