use crate::{
    media::{ExtractResult, Format, SubtitleTrack},
    store::Preferences,
};

/// Renditions of one result, bucketed for presentation.
#[derive(Debug, Default)]
pub struct Classified<'a> {
    /// muxed renditions, not subject to preference filters
    pub recommended: Vec<&'a Format>,
    pub video: Vec<&'a Format>,
    pub audio: Vec<&'a Format>,
}

fn passes_filters(format: &Format, prefs: &Preferences) -> bool {
    (!prefs.only_mp4 || format.is_mp4())
        && (!prefs.only_muxed || format.is_muxed())
        && !(prefs.hide_streaming && format.is_streaming())
}

/// Split formats into video/audio by `is_audio_only` and collect muxed ones as
/// recommendations. Server order is kept.
pub fn classify<'a>(result: &'a ExtractResult, prefs: &Preferences) -> Classified<'a> {
    let recommended = result.formats.iter().filter(|f| f.is_muxed()).collect();

    let (audio, video): (Vec<&Format>, Vec<&Format>) = result
        .formats
        .iter()
        .filter(|f| passes_filters(f, prefs))
        .partition(|f| f.is_audio_only);

    Classified {
        recommended,
        video,
        audio,
    }
}

/// Subtitle tracks grouped by language, languages in first-seen order.
pub fn group_subtitles(tracks: &[SubtitleTrack]) -> Vec<(&str, Vec<&SubtitleTrack>)> {
    let mut groups: Vec<(&str, Vec<&SubtitleTrack>)> = Vec::new();

    for track in tracks {
        match groups.iter_mut().find(|(lang, _)| *lang == track.lang) {
            Some((_, group)) => group.push(track),
            None => groups.push((track.lang.as_str(), vec![track])),
        }
    }

    groups
}
