use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static LOOSE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/shorts/)([^&\n?#/]+)")
        .expect("Invalid video id regex")
});

/// Extract the YouTube video id from the common URL shapes.
///
/// Handles `watch?v=`, `youtu.be/`, `/embed/`, `/shorts/` and `/live/`.
/// Falls back to a loose pattern match for strings that aren't valid URLs.
#[must_use]
pub fn youtube_video_id(input: &str) -> Option<String> {
    let input = input.trim();

    Url::parse(input)
        .ok()
        .and_then(|url| from_url(&url))
        .or_else(|| {
            LOOSE_ID
                .captures(input)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
        })
        .filter(|id| is_plausible_id(id))
}

fn from_url(url: &Url) -> Option<String> {
    let host = url.host_str()?.trim_start_matches("www.").trim_start_matches("m.");

    match host {
        "youtu.be" => url.path_segments()?.next().map(ToString::to_string),
        "youtube.com" | "music.youtube.com" | "youtube-nocookie.com" => {
            let mut segments = url.path_segments()?;

            match segments.next()? {
                "watch" => url
                    .query_pairs()
                    .find_map(|(k, v)| (k == "v").then(|| v.into_owned())),
                "embed" | "shorts" | "live" | "v" => segments.next().map(ToString::to_string),
                _ => None,
            }
        }
        _ => None,
    }
}

fn is_plausible_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
