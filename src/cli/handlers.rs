use std::io::Read;

use anyhow::{bail, Result};

use crate::{
    app::{
        errors::INVALID_URL,
        factory::AppContext,
        session::{Command, Phase, Submission},
    },
    media::Format,
    normalize::normalize_input_url,
    store::Preferences,
};

use super::{render, types::PrefsArgs};

/// Wait for the request to settle. Ctrl-C cancels it instead of killing the process.
async fn settle(ctx: &AppContext, handle: tokio::task::JoinHandle<()>) -> Result<()> {
    tokio::pin!(handle);

    tokio::select! {
        joined = &mut handle => joined?,
        _ = tokio::signal::ctrl_c() => {
            log::info!("cancelling request");
            ctx.session.cancel();
            handle.await?;
        }
    }

    Ok(())
}

async fn run_command(ctx: &AppContext, command: Command, json: bool) -> Result<()> {
    let prefs = ctx.store.load_preferences();

    match ctx.session.dispatch(command, &prefs) {
        Submission::Started(handle) => settle(ctx, handle).await?,
        Submission::Prefilled(url) => {
            println!("Shared link: {url}");
            println!("Auto-analyze is off. Run `aoi extract {url}` to analyze it.");
            return Ok(());
        }
        Submission::Ignored => return Ok(()),
        Submission::Rejected => {}
    }

    let state = ctx.session.snapshot();
    match (state.phase, &state.result, &state.source) {
        (Phase::Succeeded, Some(result), Some(source)) => {
            if json {
                render::print_json(source, result, &prefs, &ctx.links)?;
            } else {
                render::print_result(
                    source,
                    result,
                    &prefs,
                    &ctx.links,
                    ctx.config.recommended_limit,
                );
            }
            Ok(())
        }
        (Phase::Failed, ..) => {
            render::print_failure(&state);
            bail!("extraction failed")
        }
        _ => {
            println!("Cancelled");
            Ok(())
        }
    }
}

pub async fn handle_extract(ctx: &AppContext, url: String, json: bool) -> Result<()> {
    let command = if url == "-" {
        let mut pasted = String::new();
        std::io::stdin().read_to_string(&mut pasted)?;
        Command::Paste(pasted)
    } else {
        Command::Submit(url)
    };

    run_command(ctx, command, json).await
}

pub async fn handle_share(ctx: &AppContext, text: String, json: bool) -> Result<()> {
    run_command(ctx, Command::Share(text), json).await
}

pub fn handle_link(ctx: &AppContext, source: String, format_id: String, mp3: bool) -> Result<()> {
    let Some(source) = normalize_input_url(&source) else {
        bail!(INVALID_URL);
    };

    let format = Format {
        format_id,
        ..Default::default()
    };
    let link = if mp3 {
        ctx.links.audio_conversion_link(Some(&source), &format)
    } else {
        ctx.links.download_link(Some(&source), &format)
    };

    match link {
        Some(link) => {
            println!("{link}");
            Ok(())
        }
        None => bail!("a format id is required"),
    }
}

pub fn handle_history(ctx: &AppContext, clear: bool) -> Result<()> {
    if clear {
        ctx.store.clear_history()?;
        println!("History cleared");
        return Ok(());
    }

    render::print_history(&ctx.store.load_history());
    Ok(())
}

pub fn handle_prefs(ctx: &AppContext, action: Option<PrefsArgs>) -> Result<()> {
    let prefs = match action.unwrap_or(PrefsArgs::Show {}) {
        PrefsArgs::Show {} => ctx.store.load_preferences(),
        PrefsArgs::Set {
            only_mp4,
            only_muxed,
            hide_streaming,
            auto_analyze_on_share,
        } => {
            let current = ctx.store.load_preferences();
            let prefs = Preferences {
                only_mp4: only_mp4.unwrap_or(current.only_mp4),
                only_muxed: only_muxed.unwrap_or(current.only_muxed),
                hide_streaming: hide_streaming.unwrap_or(current.hide_streaming),
                auto_analyze_on_share: auto_analyze_on_share
                    .unwrap_or(current.auto_analyze_on_share),
            };
            if prefs == current {
                println!("This update request does nothing");
            } else {
                ctx.store.save_preferences(&prefs)?;
            }
            prefs
        }
        PrefsArgs::Reset {} => {
            let prefs = Preferences::default();
            ctx.store.save_preferences(&prefs)?;
            prefs
        }
    };

    render::print_preferences(&prefs);
    Ok(())
}

pub async fn handle_status(ctx: &AppContext) -> Result<()> {
    let status = ctx.backend.status().await?;

    println!(
        "server: {}",
        if status.healthy { "ok" } else { "unreachable" }
    );
    match status.cookies {
        Some(cookies) => println!("cookies: {cookies}"),
        None => println!("cookies: unknown"),
    }
    Ok(())
}
