use serde::Serialize;

use crate::{
    app::session::SessionState,
    classify::{classify, group_subtitles, Classified},
    links::LinkBuilder,
    media::{format_duration, ExtractResult, Format},
    store::{HistoryEntry, Preferences},
};

#[derive(Serialize)]
struct FormatView<'a> {
    #[serde(flatten)]
    format: &'a Format,
    download_url: Option<String>,
    mp3_url: Option<String>,
}

#[derive(Serialize)]
struct ResultView<'a> {
    source: &'a str,
    title: Option<&'a str>,
    duration: Option<f64>,
    extractor: Option<&'a str>,
    webpage_url: Option<&'a str>,
    recommended: Vec<FormatView<'a>>,
    video: Vec<FormatView<'a>>,
    audio: Vec<FormatView<'a>>,
    subtitles: Vec<serde_json::Value>,
}

fn view<'a>(links: &LinkBuilder, source: &str, formats: &[&'a Format]) -> Vec<FormatView<'a>> {
    formats
        .iter()
        .map(|&format| FormatView {
            format,
            download_url: links.download_link(Some(source), format),
            mp3_url: format
                .is_audio_only
                .then(|| links.audio_conversion_link(Some(source), format))
                .flatten(),
        })
        .collect()
}

pub fn print_json(
    source: &str,
    result: &ExtractResult,
    prefs: &Preferences,
    links: &LinkBuilder,
) -> anyhow::Result<()> {
    let Classified {
        recommended,
        video,
        audio,
    } = classify(result, prefs);

    let subtitles: Vec<serde_json::Value> = result
        .subtitles
        .iter()
        .map(|track| {
            serde_json::json!({
                "lang": track.lang,
                "ext": track.ext,
                "auto": track.auto,
                "url": links.subtitle_link(Some(source), track),
            })
        })
        .collect();

    let out = ResultView {
        source,
        title: result.title.as_deref(),
        duration: result.duration,
        extractor: result.extractor.as_deref(),
        webpage_url: result.webpage_url.as_deref(),
        recommended: view(links, source, &recommended),
        video: view(links, source, &video),
        audio: view(links, source, &audio),
        subtitles,
    };

    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn print_format(links: &LinkBuilder, source: &str, format: &Format) {
    let protocol = format
        .protocol_label()
        .map(|label| format!(" [{label}]"))
        .unwrap_or_default();
    println!(
        "  {:<28} {:>12}{protocol}",
        format.summary(),
        format.size_label()
    );

    if let Some(url) = links.download_link(Some(source), format) {
        println!("    download: {url}");
    }
    if format.is_audio_only {
        if let Some(url) = links.audio_conversion_link(Some(source), format) {
            println!("    mp3:      {url}");
        }
    }
}

pub fn print_result(
    source: &str,
    result: &ExtractResult,
    prefs: &Preferences,
    links: &LinkBuilder,
    recommended_limit: usize,
) {
    let classified = classify(result, prefs);

    println!("{}", result.title.as_deref().unwrap_or("Untitled"));
    println!("Duration: {}", format_duration(result.duration));
    if let Some(extractor) = &result.extractor {
        println!("Extractor: {extractor}");
    }

    if !classified.recommended.is_empty() {
        println!("\nRecommended");
        for format in classified.recommended.iter().take(recommended_limit) {
            print_format(links, source, format);
        }
    }

    println!("\nVideo");
    if classified.video.is_empty() {
        println!("  (none match the current filters)");
    }
    for format in &classified.video {
        print_format(links, source, format);
    }

    println!("\nAudio");
    if classified.audio.is_empty() {
        println!("  (none match the current filters)");
    }
    for format in &classified.audio {
        print_format(links, source, format);
    }

    let groups = group_subtitles(&result.subtitles);
    if !groups.is_empty() {
        println!("\nSubtitles");
        for (lang, tracks) in groups {
            println!("  {lang}");
            for track in tracks {
                let kind = if track.auto { "auto" } else { "manual" };
                let ext = track.ext.as_deref().unwrap_or("?");
                if let Some(url) = links.subtitle_link(Some(source), track) {
                    println!("    {kind} {ext}: {url}");
                }
            }
        }
    }
}

/// Print the error and any hints to stderr.
pub fn print_failure(state: &SessionState) {
    if let Some(message) = &state.error_message {
        eprintln!("error: {message}");
    }
    for hint in &state.hints {
        eprintln!("hint: {hint}");
    }
}

pub fn print_history(history: &[HistoryEntry]) {
    if history.is_empty() {
        println!("No recent links");
        return;
    }

    for entry in history {
        let when = chrono::DateTime::<chrono::Utc>::from_timestamp_millis(entry.at)
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        let title = entry.title.as_deref().unwrap_or("Untitled");
        match &entry.extractor {
            Some(extractor) => println!("{when}  {title} ({extractor})"),
            None => println!("{when}  {title}"),
        }
        println!("    {}", entry.url);
    }
}

pub fn print_preferences(prefs: &Preferences) {
    println!("only_mp4:              {}", prefs.only_mp4);
    println!("only_muxed:            {}", prefs.only_muxed);
    println!("hide_streaming:        {}", prefs.hide_streaming);
    println!("auto_analyze_on_share: {}", prefs.auto_analyze_on_share);
}
