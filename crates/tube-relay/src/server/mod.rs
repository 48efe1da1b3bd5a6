use std::{net::SocketAddr, sync::Arc, time::Duration};

use app_config::{server::ServerConfig, Config};
use app_relay::{Relay, RelaySettings};
use axum::{
    http::{header, HeaderValue, Request},
    middleware,
    response::Response,
};
use listenfd::ListenFd;
use once_cell::sync::Lazy;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{debug, field, info, Span};

mod app_helpers;
mod app_middleware;
mod app_response;
mod routes;

pub async fn run() -> anyhow::Result<()> {
    app_logger::info!("Starting server...");
    let config = Config::global();

    app_response::expose_error_chain(config.server.environment.is_development());

    let state = AppState::from_config(config)?;
    app_logger::trace!(state = ?state, "Created app state");

    let router = app(state, &config.server);

    app_logger::trace!(?router, "Finished building app router");

    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener)?
        }
        None => {
            let host = config.server.host.clone();
            let port = config.server.port;

            TcpListener::bind((host, port)).await?
        }
    };

    info!("Server listening on http://{}", listener.local_addr()?);
    info!(environment = %config.server.environment, "Environment");
    info!(
        cors = ?config.server.cors_origins,
        "CORS origins (empty mirrors every origin)"
    );
    info!(
        cookies = ?config.relay.cookies_path,
        exists = config.relay.cookies_path.is_file(),
        "Cookies file"
    );

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

static CACHE_CONTROL: Lazy<HeaderValue> =
    Lazy::new(|| HeaderValue::from_static("private, max-age=0"));

#[derive(Clone)]
struct MakeRequestUlid;
impl MakeRequestId for MakeRequestUlid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let mut id = ulid::Ulid::new().to_string();
        id.make_ascii_lowercase();
        let val = HeaderValue::from_str(&id).ok()?;

        Some(RequestId::new(val))
    }
}

type AppRouter = axum::Router<AppState>;

#[derive(Debug, Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
    pub server: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(relay: Relay, server: ServerConfig) -> Self {
        Self {
            relay: Arc::new(relay),
            server: Arc::new(server),
        }
    }

    fn from_config(config: &Config) -> anyhow::Result<Self> {
        let relay = Relay::new(RelaySettings::from_config(config))?;

        Ok(Self::new(relay, config.server.clone()))
    }
}

/// The full application: routes, middlewares and state.
pub fn app(state: AppState, server: &ServerConfig) -> axum::Router {
    add_middlewares(routes::router(), server).with_state(state)
}

fn add_middlewares<T>(router: axum::Router<T>, server: &ServerConfig) -> axum::Router<T>
where
    T: std::clone::Clone + Send + Sync + 'static,
{
    let request_timeout: Duration = server.request_timeout.into();

    router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUlid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(|request: &Request<_>| {
                            let m = request.method();
                            let p = request.uri().path();
                            let id = request
                                .extensions()
                                .get::<RequestId>()
                                .and_then(|id| id.header_value().to_str().ok())
                                .unwrap_or("-");
                            let dur = field::Empty;

                            tracing::info_span!("", %id, %m, ?p, dur)
                        })
                        .on_request(|request: &Request<_>, _span: &Span| {
                            let headers = request.headers();
                            info!(
                                target: "request",
                                "START \"{method} {uri} {http_type:?}\" {user_agent:?} {ip:?}",
                                http_type = request.version(),
                                method = request.method(),
                                uri = request.uri(),
                                user_agent = headers
                                    .get(header::USER_AGENT)
                                    .map_or("-", |x| x.to_str().unwrap_or("-")),
                                ip = headers
                                    .get("x-forwarded-for")
                                    .map_or("-", |x| x.to_str().unwrap_or("-")),
                            );
                        })
                        .on_response(|response: &Response<_>, latency, span: &Span| {
                            span.record("dur", field::debug(latency));
                            debug!(
                                target: "request",
                                "END {status}",
                                status = response.status().as_u16(),
                            );
                        })
                        .on_body_chunk(())
                        .on_eos(|_trailers: Option<&_>, stream_duration, span: &Span| {
                            span.record("dur", field::debug(stream_duration));
                            debug!(target: "request", "Stream finished");
                        })
                        .on_failure(|error, latency, span: &Span| {
                            span.record("dur", field::debug(latency));
                            debug!(
                                target: "request",
                                err = ?error,
                                "ERR: something went wrong",
                            );
                        }),
                )
                // Only covers the time until the response head is ready,
                // streamed bodies are bounded by the download deadline.
                .layer(TimeoutLayer::new(request_timeout))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::CACHE_CONTROL,
                    |_response: &Response<_>| Some(CACHE_CONTROL.clone()),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::DATE,
                    |_response: &Response<_>| {
                        HeaderValue::from_str(&chrono::Utc::now().to_rfc2822()).ok()
                    },
                ))
                .layer(middleware::from_fn(app_middleware::cors::log_origin)),
        )
        .layer(app_middleware::cors::layer(&server.cors_origins))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::{path::PathBuf, time::Duration};

    use app_config::server::ServerConfig;
    use app_helpers::temp_dir::TempDir;
    use app_relay::{Relay, RelaySettings};
    use axum::{
        body::Body,
        http::{header, Method, Request, Response},
    };
    use tower::ServiceExt;

    use super::{app, AppState};

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

    #[cfg(unix)]
    pub fn fake_yt_dlp(dir: &TempDir, body: &str) -> PathBuf {
        dir.write_executable("yt-dlp", &format!("#!/bin/sh\n{body}\n"))
            .expect("write fake yt-dlp")
    }

    pub fn router(settings: RelaySettings) -> axum::Router {
        let server = ServerConfig::default();
        let relay = Relay::new(settings).expect("relay");

        app(AppState::new(relay, server.clone()), &server)
    }

    pub fn offline_router() -> (TempDir, axum::Router) {
        let dir = TempDir::with_prefix("tube-relay-test-").expect("create temp dir");
        let router = router(settings(&dir, dir.path().join("missing-yt-dlp")));

        (dir, router)
    }

    pub async fn send(router: axum::Router, req: Request<Body>) -> Response<Body> {
        router.oneshot(req).await.expect("infallible")
    }

    pub fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    pub async fn json_body(res: Response<Body>) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .expect("read body");

        serde_json::from_slice(&bytes).expect("json body")
    }
}
