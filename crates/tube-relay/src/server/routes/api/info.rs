use app_relay::{
    metadata::{UniversalInfo, VideoInfo},
    RelayError,
};
use axum::{extract::State, Json};
use tracing::info;

use crate::server::{app_helpers::payload::MediaPayload, app_response::ApiError, AppState};

type InfoResponse<T> = Result<Json<T>, ApiError>;

pub(super) async fn info(
    State(state): State<AppState>,
    payload: MediaPayload,
) -> InfoResponse<VideoInfo> {
    let url = payload.media_url()?;
    info!(%url, "Fetching video info");

    Ok(Json(state.relay.info(&url).await?))
}

pub(super) async fn info_universal(
    State(state): State<AppState>,
    payload: MediaPayload,
) -> InfoResponse<UniversalInfo> {
    let url = payload.media_url()?;
    info!(%url, "Fetching universal video info");

    match state.relay.info_universal(&url).await {
        Ok(x) => Ok(Json(x)),
        Err(e @ RelayError::Noembed(_)) => Err(ApiError::from(e)
            .with_error("Unable to fetch video information")
            .with_suggestion("Please check the URL and try again")),
        Err(e) => Err(e.into()),
    }
}

pub(super) async fn info_noembed(
    State(state): State<AppState>,
    payload: MediaPayload,
) -> InfoResponse<VideoInfo> {
    let url = payload.media_url()?;
    info!(%url, "Fetching basic video info");

    Ok(Json(state.relay.info_noembed(&url).await?))
}
