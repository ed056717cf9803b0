mod classify;
mod store;

use crate::media::{ExtractResult, Format};

pub fn format(id: &str, ext: &str, vcodec: &str, acodec: &str, audio_only: bool) -> Format {
    Format {
        format_id: id.to_string(),
        ext: Some(ext.to_string()),
        vcodec: Some(vcodec.to_string()),
        acodec: Some(acodec.to_string()),
        is_audio_only: audio_only,
        ..Default::default()
    }
}

/// A youtube-like result: muxed progressive, video-only, hls video, audio-only.
pub fn sample_result() -> ExtractResult {
    let mut hls = format("95", "mp4", "avc1", "mp4a", false);
    hls.protocol = Some("m3u8_native".to_string());
    hls.resolution = Some("1280x720".to_string());

    let mut dash_audio = format("251", "webm", "none", "opus", true);
    dash_audio.protocol = Some("http_dash_segments".to_string());

    ExtractResult {
        id: Some("dQw4w9WgXcQ".to_string()),
        title: Some("Sample Title".to_string()),
        duration: Some(213.0),
        webpage_url: Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string()),
        extractor: Some("youtube".to_string()),
        formats: vec![
            format("18", "mp4", "avc1.42001E", "mp4a.40.2", false),
            format("137", "MP4", "avc1.640028", "none", false),
            format("248", "webm", "vp9", "none", false),
            hls,
            format("140", "m4a", "none", "mp4a.40.2", true),
            dash_audio,
        ],
        ..Default::default()
    }
}
