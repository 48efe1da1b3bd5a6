use std::{
    error::Error as StdError,
    sync::atomic::{AtomicBool, Ordering},
};

use app_relay::RelayError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, warn};

pub mod error;

pub use error::ApiError;

static EXPOSE_ERROR_CHAIN: AtomicBool = AtomicBool::new(false);

/// Attach the source chain of every error to its payload.
///
/// Enabled in the development environment.
pub fn expose_error_chain(expose: bool) {
    EXPOSE_ERROR_CHAIN.store(expose, Ordering::Relaxed);
}

fn error_chain(err: &(dyn StdError + 'static)) -> Option<Vec<String>> {
    if !EXPOSE_ERROR_CHAIN.load(Ordering::Relaxed) {
        return None;
    }

    let mut chain = vec![err.to_string()];
    let mut source = err.source();
    while let Some(e) = source {
        chain.push(e.to_string());
        source = e.source();
    }

    Some(chain)
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        let res = match &err {
            RelayError::MissingUrl | RelayError::InvalidUrl | RelayError::InvalidYoutubeUrl => {
                Self::bad_request(err.to_string())
            }

            e if e.is_fatal() => Self::new(StatusCode::BAD_REQUEST, "Video not available"),

            RelayError::Metadata(_) => {
                Self::internal("Unable to fetch video information")
                    .with_suggestion("Try again later or use a different video")
            }

            RelayError::TitleUnavailable(_) => Self::internal("Download initialization failed"),

            RelayError::Download(_) => Self::internal("Download failed")
                .with_suggestion("Try again later or use a different video"),

            RelayError::Noembed(e) => {
                Self::internal("Failed to fetch video information").with_details(e.to_string())
            }

            RelayError::Client(e) => Self::internal("Internal server error").with_details(e.to_string()),
        };

        let res = match err.chain() {
            Some(chain) => res
                .with_details(chain.reason())
                .with_methods(chain.tried.clone()),
            None => res,
        };

        if res.status.is_server_error() {
            warn!(err = ?err, "Request failed");
        } else {
            debug!(err = %err, "Request rejected");
        }

        res.with_debug(error_chain(&err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
