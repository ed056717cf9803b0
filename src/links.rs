use url::form_urlencoded;

use crate::media::{Format, SubtitleTrack};

pub const DOWNLOAD_PATH: &str = "/api/download";
pub const CONVERT_MP3_PATH: &str = "/api/convert_mp3";
pub const SUBTITLE_PATH: &str = "/api/subtitle";

/// Builds proxy links that let the server fetch a rendition on the user's behalf.
///
/// The analyzed source URL is always passed in explicitly.
#[derive(Clone, Debug, Default)]
pub struct LinkBuilder {
    base: String,
}

impl LinkBuilder {
    /// `base` is the server origin; an empty base yields relative links.
    pub fn new(base: &str) -> Self {
        Self {
            base: base.strip_suffix('/').unwrap_or(base).to_string(),
        }
    }

    fn build(&self, path: &str, params: &[(&str, &str)]) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params)
            .finish();
        format!("{}{path}?{query}", self.base)
    }

    /// Proxy download link, or the format's direct URL when no proxy link can be made.
    pub fn download_link(&self, source: Option<&str>, format: &Format) -> Option<String> {
        match source {
            Some(source) if !source.is_empty() && !format.format_id.is_empty() => Some(
                self.build(
                    DOWNLOAD_PATH,
                    &[("source", source), ("format_id", format.format_id.as_str())],
                ),
            ),
            _ => format.direct_url.clone(),
        }
    }

    pub fn audio_conversion_link(&self, source: Option<&str>, format: &Format) -> Option<String> {
        let source = source.filter(|s| !s.is_empty())?;

        let mut params = vec![("source", source)];
        if !format.format_id.is_empty() {
            params.push(("format_id", format.format_id.as_str()));
        }

        Some(self.build(CONVERT_MP3_PATH, &params))
    }

    pub fn subtitle_link(&self, source: Option<&str>, track: &SubtitleTrack) -> Option<String> {
        let source = source.filter(|s| !s.is_empty())?;

        let mut params = vec![("source", source), ("lang", track.lang.as_str())];
        if let Some(ext) = &track.ext {
            params.push(("ext", ext.as_str()));
        }
        if track.auto {
            params.push(("auto", "1"));
        }

        Some(self.build(SUBTITLE_PATH, &params))
    }
}
