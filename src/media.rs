use serde::{Deserialize, Deserializer, Serialize};

/// Codec value the extractor uses for "stream not present".
pub const NO_CODEC: &str = "none";

const EM_DASH: &str = "—";

/// Body of a successful `POST /api/extract`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractResult {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// seconds
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub webpage_url: Option<String>,
    #[serde(default)]
    pub extractor: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub formats: Vec<Format>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subtitles: Vec<SubtitleTrack>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single downloadable rendition.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Format {
    pub format_id: String,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub fps: Option<f64>,
    #[serde(default)]
    pub vcodec: Option<String>,
    #[serde(default)]
    pub acodec: Option<String>,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub filesize_pretty: Option<String>,
    #[serde(default)]
    pub audio_bitrate: Option<u32>,
    #[serde(default)]
    pub direct_url: Option<String>,
    #[serde(default)]
    pub is_audio_only: bool,
    #[serde(default)]
    pub protocol: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SubtitleTrack {
    pub lang: String,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub auto: bool,
}

fn has_stream(codec: &Option<String>) -> bool {
    codec.as_deref().is_some_and(|c| c != NO_CODEC)
}

impl Format {
    /// Both a video and an audio stream in one file.
    pub fn is_muxed(&self) -> bool {
        has_stream(&self.vcodec) && has_stream(&self.acodec)
    }

    pub fn is_mp4(&self) -> bool {
        self.ext
            .as_deref()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("mp4"))
    }

    /// HLS or DASH manifests rather than a single progressive file.
    pub fn is_streaming(&self) -> bool {
        self.protocol.as_deref().is_some_and(|protocol| {
            let protocol = protocol.to_lowercase();
            protocol.contains("m3u8") || protocol.contains("dash")
        })
    }

    pub fn protocol_label(&self) -> Option<&'static str> {
        let protocol = self.protocol.as_deref()?.to_lowercase();
        if protocol.contains("m3u8") {
            Some("HLS")
        } else if protocol.contains("dash") {
            Some("DASH")
        } else {
            None
        }
    }

    pub fn quality_label(&self) -> String {
        match (&self.resolution, self.audio_bitrate) {
            (Some(resolution), _) => resolution.clone(),
            (None, Some(abr)) if abr > 0 => format!("{abr}kbps"),
            _ => EM_DASH.to_string(),
        }
    }

    /// One-line description, e.g. `1080p 60fps · mp4`.
    pub fn summary(&self) -> String {
        let mut parts = vec![self.quality_label()];
        if let Some(fps) = self.fps.filter(|fps| *fps > 0.0) {
            parts.push(format!("{}fps", fps.round() as u64));
        }
        if let Some(ext) = &self.ext {
            parts.push(format!("· {ext}"));
        }
        parts.join(" ")
    }

    pub fn size_label(&self) -> String {
        self.filesize_pretty
            .clone()
            .or_else(|| self.filesize.and_then(human_readable_bytes))
            .unwrap_or_else(|| "Size unknown".to_string())
    }
}

/// `H:MM:SS` above an hour, `MM:SS` below, an em dash for zero or unknown.
pub fn format_duration(seconds: Option<f64>) -> String {
    let total = match seconds {
        Some(s) if s.is_finite() && s > 0.0 => s as u64,
        _ => return EM_DASH.to_string(),
    };

    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

pub fn human_readable_bytes(num_bytes: u64) -> Option<String> {
    if num_bytes == 0 {
        return None;
    }

    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size = num_bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        Some(format!("{num_bytes} B"))
    } else {
        Some(format!("{size:.2} {}", UNITS[unit]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(None), "—");
        assert_eq!(format_duration(Some(0.0)), "—");
        assert_eq!(format_duration(Some(59.0)), "00:59");
        assert_eq!(format_duration(Some(65.0)), "01:05");
        assert_eq!(format_duration(Some(3600.0)), "1:00:00");
        assert_eq!(format_duration(Some(3665.0)), "1:01:05");
    }

    #[test]
    fn test_muxed_requires_both_real_codecs() {
        let mut f = Format {
            format_id: "18".into(),
            vcodec: Some("avc1".into()),
            acodec: Some("mp4a".into()),
            ..Default::default()
        };
        assert!(f.is_muxed());

        f.acodec = Some("none".into());
        assert!(!f.is_muxed());

        f.acodec = None;
        assert!(!f.is_muxed());
    }

    #[test]
    fn test_summary_and_labels() {
        let f = Format {
            format_id: "137".into(),
            ext: Some("mp4".into()),
            resolution: Some("1080p".into()),
            fps: Some(60.0),
            filesize_pretty: Some("20 MB".into()),
            ..Default::default()
        };
        assert_eq!(f.summary(), "1080p 60fps · mp4");
        assert_eq!(f.size_label(), "20 MB");

        let audio = Format {
            format_id: "140".into(),
            ext: Some("m4a".into()),
            audio_bitrate: Some(128),
            protocol: Some("M3U8_native".into()),
            filesize: Some(2048),
            is_audio_only: true,
            ..Default::default()
        };
        assert_eq!(audio.summary(), "128kbps · m4a");
        assert_eq!(audio.protocol_label(), Some("HLS"));
        assert!(audio.is_streaming());
        assert_eq!(audio.size_label(), "2.00 KB");
    }

    #[test]
    fn test_extract_result_tolerates_missing_fields() {
        let result: ExtractResult = serde_json::from_str(
            r#"{"title": null, "subtitles": null, "formats": [{"format_id": "18", "fps": 30, "is_audio_only": false}]}"#,
        )
        .unwrap();
        assert_eq!(result.title, None);
        assert_eq!(result.formats.len(), 1);
        assert!(result.subtitles.is_empty());
    }
}
