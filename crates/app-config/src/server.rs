use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::timeframe::{value_parser_parse_timeframe, Timeframe};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
}
impl Environment {
    #[must_use]
    pub const fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }
}
impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Args, Validate)]
#[clap(next_help_heading = "Server options")]
pub struct ServerConfig {
    /// The port on which the server will listen.
    #[arg(long, default_value = "5000", env = "PORT", value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,

    /// The host on which the server will listen.
    #[arg(long, default_value = "0.0.0.0", env = "HOST")]
    pub host: String,

    /// Origins allowed to make cross-origin requests.
    ///
    /// Comma separated. If empty or `*`, the request origin is mirrored back
    /// for every request (credentials allowed).
    #[arg(long = "cors-origin", env = "CORS_ORIGIN", value_delimiter = ',', num_args = 0..)]
    pub cors_origins: Vec<String>,

    /// The environment the server runs in.
    ///
    /// In development, error responses include the full error chain.
    #[arg(long, value_enum, default_value_t = Environment::Production, env = "TUBE_RELAY_ENVIRONMENT")]
    pub environment: Environment,

    /// How long a request may take before the response has started.
    #[arg(long, default_value = "5min", env = "TUBE_RELAY_REQUEST_TIMEOUT", value_parser = value_parser_parse_timeframe())]
    pub request_timeout: Timeframe,
}
impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            host: "0.0.0.0".to_string(),
            cors_origins: vec![],
            environment: Environment::default(),
            request_timeout: Timeframe::Minutes(5),
        }
    }
}
