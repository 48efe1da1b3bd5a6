use once_cell::sync::Lazy;
use regex::Regex;

pub const FALLBACK_FILE_STEM: &str = "download";

static NON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s]").expect("Invalid non-word regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// Turn a video title into something safe to put in a `Content-Disposition` header.
///
/// Only ASCII word characters survive, whitespace runs (Unicode included)
/// become a single `_`.
#[must_use]
pub fn title_to_file_stem(title: &str) -> String {
    let ascii_only = title
        .chars()
        .map(|c| match c {
            c if c.is_whitespace() || c == '\u{feff}' => ' ',
            c if c.is_ascii() => c,
            _ => '\u{1}',
        })
        .collect::<String>();

    let stem = NON_WORD.replace_all(&ascii_only, "");
    let stem = WHITESPACE.replace_all(stem.trim(), "_");

    if stem.is_empty() {
        FALLBACK_FILE_STEM.to_string()
    } else {
        stem.into_owned()
    }
}

#[must_use]
pub fn attachment_file_name(title: &str, extension: &str) -> String {
    format!("{}.{}", title_to_file_stem(title), extension)
}
