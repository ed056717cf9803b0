use crate::classify::{classify, group_subtitles};
use crate::media::SubtitleTrack;
use crate::store::Preferences;

use super::{format, sample_result};

fn ids(formats: &[&crate::media::Format]) -> Vec<String> {
    formats.iter().map(|f| f.format_id.clone()).collect()
}

#[test]
pub fn test_partition_is_total_and_disjoint() {
    let result = sample_result();
    let classified = classify(&result, &Preferences::default());

    assert_eq!(
        classified.video.len() + classified.audio.len(),
        result.formats.len()
    );
    for video in &classified.video {
        assert!(!classified
            .audio
            .iter()
            .any(|audio| audio.format_id == video.format_id));
    }

    assert_eq!(ids(&classified.video), vec!["18", "137", "248", "95"]);
    assert_eq!(ids(&classified.audio), vec!["140", "251"]);
}

#[test]
pub fn test_recommended_ignores_preferences() {
    let result = sample_result();
    let prefs = Preferences {
        only_mp4: true,
        only_muxed: true,
        hide_streaming: true,
        ..Default::default()
    };

    let classified = classify(&result, &prefs);
    // the hls rendition is muxed, so it stays recommended even though it is hidden
    assert_eq!(ids(&classified.recommended), vec!["18", "95"]);
    assert_eq!(ids(&classified.video), vec!["18"]);
    assert!(classified.audio.is_empty());
}

#[test]
pub fn test_recommended_does_not_assume_muxed_is_video() {
    let mut result = sample_result();
    result.formats = vec![format("odd", "mp4", "avc1", "mp4a", true)];

    let classified = classify(&result, &Preferences::default());
    assert_eq!(ids(&classified.recommended), vec!["odd"]);
    assert_eq!(ids(&classified.audio), vec!["odd"]);
    assert!(classified.video.is_empty());
}

#[test]
pub fn test_individual_filters() {
    let result = sample_result();

    let only_mp4 = classify(
        &result,
        &Preferences {
            only_mp4: true,
            ..Default::default()
        },
    );
    // ext comparison is case-insensitive
    assert_eq!(ids(&only_mp4.video), vec!["18", "137", "95"]);
    assert!(only_mp4.audio.is_empty());

    let only_muxed = classify(
        &result,
        &Preferences {
            only_muxed: true,
            ..Default::default()
        },
    );
    assert_eq!(ids(&only_muxed.video), vec!["18", "95"]);

    let hide_streaming = classify(
        &result,
        &Preferences {
            hide_streaming: true,
            ..Default::default()
        },
    );
    assert_eq!(ids(&hide_streaming.video), vec!["18", "137", "248"]);
    assert_eq!(ids(&hide_streaming.audio), vec!["140"]);
}

#[test]
pub fn test_combined_filters_are_a_subset_of_each() {
    let result = sample_result();
    let mp4 = Preferences {
        only_mp4: true,
        ..Default::default()
    };
    let muxed = Preferences {
        only_muxed: true,
        ..Default::default()
    };
    let both = Preferences {
        only_mp4: true,
        only_muxed: true,
        ..Default::default()
    };

    let mp4 = ids(&classify(&result, &mp4).video);
    let muxed = ids(&classify(&result, &muxed).video);
    let both = ids(&classify(&result, &both).video);

    assert!(!both.is_empty());
    assert!(both.iter().all(|id| mp4.contains(id) && muxed.contains(id)));
}

#[test]
pub fn test_subtitles_grouped_by_language() {
    let track = |lang: &str, auto: bool| SubtitleTrack {
        lang: lang.to_string(),
        ext: Some("vtt".to_string()),
        url: None,
        auto,
    };
    let tracks = vec![track("en", false), track("de", true), track("en", true)];

    let groups = group_subtitles(&tracks);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].0, "en");
    assert_eq!(groups[0].1.len(), 2);
    assert!(groups[0].1[1].auto);
    assert_eq!(groups[1].0, "de");
}
