use app_relay::diagnostics::{DiagnosticsReport, ToolVersionReport};
use axum::{
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use serde::Serialize;

use crate::server::AppState;

pub(super) async fn tool_version(State(state): State<AppState>) -> Json<ToolVersionReport> {
    Json(state.relay.tool_version().await)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Diagnostics {
    #[serde(flatten)]
    report: DiagnosticsReport,
    env: String,
    cors_origin: Option<String>,
    detected_origin: String,
}

pub(super) async fn diagnostics(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<Diagnostics> {
    let cors_origin = if state.server.cors_origins.is_empty() {
        None
    } else {
        Some(state.server.cors_origins.join(","))
    };

    let detected_origin = headers
        .get(header::ORIGIN)
        .and_then(|x| x.to_str().ok())
        .unwrap_or("no origin header")
        .to_string();

    Json(Diagnostics {
        report: state.relay.diagnose().await,
        env: state.server.environment.to_string(),
        cors_origin,
        detected_origin,
    })
}
