pub mod cleanup;
pub mod yt_dlp;
