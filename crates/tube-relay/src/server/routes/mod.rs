use std::any::Any;

use axum::{
    extract::OriginalUri,
    handler::Handler,
    http::Method,
    response::{IntoResponse, Response},
    routing::{post, MethodRouter},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{debug, error};

use super::{app_response::ApiError, AppRouter, AppState};

mod api;
mod index;

pub(super) fn router() -> AppRouter {
    Router::new()
        .merge(index::router())
        .nest("/api", api::router())
        .fallback(handle_404)
        .layer(CatchPanicLayer::custom(
            |err: Box<dyn Any + Send + 'static>| -> Response<_> {
                let details = err.downcast_ref::<String>().map_or_else(
                    || {
                        err.downcast_ref::<&str>().map_or_else(
                            || "Unknown panic message".to_string(),
                            |s| (*s).to_string(),
                        )
                    },
                    std::clone::Clone::clone,
                );

                error!(?details, "Handler panicked");

                ApiError::internal("Internal server error")
                    .with_details(details)
                    .into_response()
            },
        ))
}

/// A POST route answering every other method like an unknown route.
fn post_only<H, T>(handler: H) -> MethodRouter<AppState>
where
    H: Handler<T, AppState>,
    T: 'static,
{
    post(handler).fallback(handle_404)
}

async fn handle_404(method: Method, OriginalUri(uri): OriginalUri) -> ApiError {
    debug!(%method, %uri, "Unknown route");

    ApiError::not_found()
}
