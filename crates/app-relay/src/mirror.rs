use serde::Serialize;

use crate::{download::MediaKind, error::RelayError, relay::Relay, request::MediaUrl};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MirrorLink {
    pub message: &'static str,
    pub download_url: String,
    pub note: &'static str,
}

#[must_use]
pub fn mirror_link(base_url: &str, video_id: &str, kind: MediaKind) -> MirrorLink {
    let base_url = base_url.trim_end_matches('/');

    match kind {
        MediaKind::Video => MirrorLink {
            message: "Direct download link generated",
            download_url: format!("{base_url}/watch?v={video_id}"),
            note: "Open this link in browser to download video",
        },
        MediaKind::Audio => MirrorLink {
            message: "Direct audio download link generated",
            download_url: format!("{base_url}/watch?v={video_id}&format=mp3"),
            note: "Open this link in browser to download audio",
        },
    }
}

impl Relay {
    pub fn mirror_link(&self, url: &MediaUrl, kind: MediaKind) -> Result<MirrorLink, RelayError> {
        let id = url.youtube_id()?;

        Ok(mirror_link(&self.settings.mirror_base_url, &id, kind))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn builds_watch_links() {
        let video = mirror_link("https://www.yewtu.be/", "dQw4w9WgXcQ", MediaKind::Video);
        let audio = mirror_link("https://www.yewtu.be", "dQw4w9WgXcQ", MediaKind::Audio);

        assert_eq!(video.download_url, "https://www.yewtu.be/watch?v=dQw4w9WgXcQ");
        assert_eq!(
            audio.download_url,
            "https://www.yewtu.be/watch?v=dQw4w9WgXcQ&format=mp3"
        );
        assert_eq!(
            serde_json::to_value(&audio).expect("serialize")["message"],
            "Direct audio download link generated"
        );
    }
}
