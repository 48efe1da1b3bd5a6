use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use crate::server::AppRouter;

pub(super) fn router() -> AppRouter {
    Router::new()
        .route("/", get(banner))
        .route("/ping", get(ping))
}

async fn banner() -> Json<Value> {
    Json(json!({
        "message": "YouTube Downloader API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "info": "POST /api/info",
            "infoUniversal": "POST /api/info-universal",
            "infoFallback": "POST /api/info-fallback",
            "downloadVideo": "POST /api/download/video",
            "downloadAudio": "POST /api/download/audio",
            "downloadVideoSimple": "POST /api/download/video-simple",
            "downloadAudioSimple": "POST /api/download/audio-simple",
            "diagnostics": "GET /api/diag",
        },
    }))
}

async fn ping() -> &'static str {
    "pong"
}

#[cfg(test)]
mod test {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };

    use crate::server::test_support::{json_body, offline_router, send};

    #[tokio::test]
    async fn banner_lists_endpoints() {
        let (_dir, router) = offline_router();

        let res = send(router, Request::get("/").body(Body::empty()).expect("request")).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key("x-request-id"));
        assert_eq!(
            res.headers()
                .get(header::CACHE_CONTROL)
                .and_then(|x| x.to_str().ok()),
            Some("private, max-age=0")
        );

        let body = json_body(res).await;
        assert_eq!(body["message"], "YouTube Downloader API is running");
        assert_eq!(body["endpoints"]["info"], "POST /api/info");
    }

    #[tokio::test]
    async fn cors_mirrors_the_origin() {
        let (_dir, router) = offline_router();

        let res = send(
            router,
            Request::get("/")
                .header(header::ORIGIN, "https://frontend.example")
                .body(Body::empty())
                .expect("request"),
        )
        .await;

        let headers = res.headers();
        assert_eq!(
            headers
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|x| x.to_str().ok()),
            Some("https://frontend.example")
        );
        assert_eq!(
            headers
                .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
                .and_then(|x| x.to_str().ok()),
            Some("true")
        );
    }
}
