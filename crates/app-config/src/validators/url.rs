use std::borrow::Cow;

use url::Url;
use validator::ValidationError;

pub fn validate_is_absolute_url<'a, T>(url: T) -> Result<(), ValidationError>
where
    T: Into<Cow<'a, str>>,
{
    let parsed =
        Url::parse(url.into().as_ref()).map_err(|_| ValidationError::new("Invalid URL"))?;

    if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
        return Err(ValidationError::new("URL must be an absolute http(s) URL"));
    }

    Ok(())
}

/// Parses an absolute base URL and strips the trailing slash
/// so paths can be appended with `format!("{base}/path")`.
#[must_use]
pub fn value_parser_parse_base_url() -> impl clap::builder::TypedValueParser {
    move |s: &str| parse_base_url(s)
}

fn parse_base_url(s: &str) -> Result<String, String> {
    let parsed = Url::parse(s).map_err(|e| format!("URL must be absolute: {e}"))?;

    if parsed.cannot_be_a_base() {
        return Err("URL must be absolute".to_string());
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
