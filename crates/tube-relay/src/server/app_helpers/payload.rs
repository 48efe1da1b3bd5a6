use app_relay::MediaUrl;
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header,
    Form, Json,
};
use serde::Deserialize;

use crate::server::app_response::ApiError;

/// The `url` and `quality` fields shared by every media route.
///
/// Read from a JSON or urlencoded form body. Any other body
/// is ignored and yields an empty payload.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct MediaPayload {
    pub url: Option<String>,
    pub quality: Option<String>,
}
impl MediaPayload {
    pub fn media_url(&self) -> Result<MediaUrl, ApiError> {
        Ok(MediaUrl::parse(self.url.as_deref().unwrap_or_default())?)
    }

    pub fn quality(&self) -> Option<String> {
        self.quality
            .as_deref()
            .map(str::trim)
            .filter(|x| !x.is_empty())
            .map(ToString::to_string)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Other,
}
impl BodyKind {
    fn of(req: &Request) -> Self {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|x| x.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let mime = content_type.split(';').next().unwrap_or_default().trim();

        match mime {
            "application/json" => Self::Json,
            x if x.ends_with("+json") => Self::Json,
            "application/x-www-form-urlencoded" => Self::Form,
            _ => Self::Other,
        }
    }
}

#[async_trait]
impl<S> FromRequest<S> for MediaPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match BodyKind::of(&req) {
            BodyKind::Json => Json::<Self>::from_request(req, state)
                .await
                .map(|Json(x)| x)
                .map_err(|e| ApiError::bad_request("Invalid request body").with_details(e.body_text())),

            BodyKind::Form => Form::<Self>::from_request(req, state)
                .await
                .map(|Form(x)| x)
                .map_err(|e| ApiError::bad_request("Invalid request body").with_details(e.body_text())),

            BodyKind::Other => Ok(Self::default()),
        }
    }
}
