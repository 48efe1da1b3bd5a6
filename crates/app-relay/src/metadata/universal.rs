use serde::Serialize;

use super::VideoInfo;

pub const LIMITED_INFO_WARNING: &str = "Limited functionality - using basic info only";

/// Noembed and yt-dlp results combined into one answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversalInfo {
    #[serde(flatten)]
    pub info: VideoInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noembed_backup: Option<VideoInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yt_dlp_error: Option<String>,
}
impl UniversalInfo {
    /// yt-dlp fields win, noembed fills whatever yt-dlp left empty.
    #[must_use]
    pub fn merged(detailed: VideoInfo, basic: VideoInfo) -> Self {
        fn or_basic(detailed: String, basic: &str) -> String {
            if detailed.is_empty() {
                basic.to_string()
            } else {
                detailed
            }
        }

        let formats = if detailed.formats.is_null() {
            basic.formats.clone()
        } else {
            detailed.formats
        };

        let info = VideoInfo {
            title: or_basic(detailed.title, &basic.title),
            thumbnail: or_basic(detailed.thumbnail, &basic.thumbnail),
            duration: detailed.duration.or(basic.duration),
            author: or_basic(detailed.author, &basic.author),
            formats,
            method: detailed.method,
        };

        Self {
            info,
            fallback_available: Some(true),
            noembed_backup: Some(basic),
            warning: None,
            yt_dlp_error: None,
        }
    }

    /// Only noembed answered. `duration` comes from a separate, cheaper lookup.
    #[must_use]
    pub fn limited(basic: VideoInfo, duration: Option<u64>, yt_dlp_error: String) -> Self {
        Self {
            info: VideoInfo {
                duration: duration.or(basic.duration),
                ..basic
            },
            fallback_available: None,
            noembed_backup: None,
            warning: Some(LIMITED_INFO_WARNING.to_string()),
            yt_dlp_error: Some(yt_dlp_error),
        }
    }
}
