use axum::http::StatusCode;
use serde::Serialize;

/// The JSON payload of every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Names of the strategies that were tried
    #[serde(skip_serializing_if = "Option::is_none")]
    pub methods: Option<Vec<String>>,

    /// The error's source chain, development only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new<T: Into<String>>(status: StatusCode, error: T) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: error.into(),
                details: None,
                suggestion: None,
                methods: None,
                debug: None,
            },
        }
    }

    pub fn bad_request<T: Into<String>>(error: T) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn internal<T: Into<String>>(error: T) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Route not found")
    }

    #[must_use]
    pub fn with_error<T: Into<String>>(mut self, error: T) -> Self {
        self.body.error = error.into();
        self
    }

    #[must_use]
    pub fn with_details<T: Into<String>>(mut self, details: T) -> Self {
        self.body.details = Some(details.into());
        self
    }

    #[must_use]
    pub fn with_suggestion<T: Into<String>>(mut self, suggestion: T) -> Self {
        self.body.suggestion = Some(suggestion.into());
        self
    }

    #[must_use]
    pub fn with_methods(mut self, methods: Vec<String>) -> Self {
        self.body.methods = Some(methods);
        self
    }

    #[must_use]
    pub fn with_debug(mut self, debug: Option<Vec<String>>) -> Self {
        self.body.debug = debug;
        self
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.status.as_u16(), self.body.error)
    }
}
