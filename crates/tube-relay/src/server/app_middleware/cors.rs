use axum::{
    extract::Request,
    http::{header, HeaderName, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{debug, warn};

const ALLOWED_HEADERS: [HeaderName; 5] = [
    header::CONTENT_TYPE,
    header::AUTHORIZATION,
    header::ACCEPT,
    header::ORIGIN,
    header::RANGE,
];

const ANY_ORIGIN: &str = "*";

/// Cross-origin policy for browser clients.
///
/// With no configured origins, or with `*` among them, every request origin
/// is mirrored back. Otherwise only the listed origins are allowed.
pub fn layer(origins: &[String]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allow_origin(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(ALLOWED_HEADERS)
        .expose_headers([header::CONTENT_DISPOSITION, header::CONTENT_TYPE])
}

fn allow_origin(origins: &[String]) -> AllowOrigin {
    // A literal `*` can't be sent together with credentials.
    if origins.is_empty() || origins.iter().any(|x| x.trim() == ANY_ORIGIN) {
        return AllowOrigin::mirror_request();
    }

    AllowOrigin::list(origins.iter().filter_map(|origin| {
        HeaderValue::from_str(origin.trim())
            .map_err(|e| warn!(?origin, ?e, "Ignoring invalid CORS origin"))
            .ok()
    }))
}

pub async fn log_origin(req: Request, next: Next) -> Response {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|x| x.to_str().ok())
        .unwrap_or("-");

    debug!(target: "cors", %origin, "Request origin");

    next.run(req).await
}
