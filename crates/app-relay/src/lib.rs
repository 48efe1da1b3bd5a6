pub mod chain;
pub mod diagnostics;
pub mod download;
pub mod error;
pub mod metadata;
pub mod mirror;
mod relay;
pub mod request;
pub mod settings;
pub mod strategy;
pub mod tool;

#[cfg(test)]
mod test_support;

pub use chain::{ChainError, Outcome};
pub use download::{Download, DownloadRequest, MediaKind};
pub use error::RelayError;
pub use relay::Relay;
pub use request::MediaUrl;
pub use settings::RelaySettings;
