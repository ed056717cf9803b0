use clap::Parser;
use tracing_subscriber::EnvFilter;

mod app;
mod classify;
mod cli;
mod config;
mod hints;
mod links;
mod media;
mod normalize;
mod storage;
mod store;
#[cfg(test)]
mod tests;

use app::AppFactory;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("aoi=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = cli::Args::parse();

    let paths = AppFactory::get_paths()?;

    // everything runs on one thread; the only suspension points are network calls
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(async {
            let ctx = AppFactory::create_context(&paths)?;

            match args.command {
                cli::Command::Extract { url, json } => cli::handle_extract(&ctx, url, json).await,
                cli::Command::Share { text, json } => cli::handle_share(&ctx, text, json).await,
                cli::Command::Link {
                    source,
                    format_id,
                    mp3,
                } => cli::handle_link(&ctx, source, format_id, mp3),
                cli::Command::History { clear } => cli::handle_history(&ctx, clear),
                cli::Command::Prefs { action } => cli::handle_prefs(&ctx, action),
                cli::Command::Status {} => cli::handle_status(&ctx).await,
            }
        })
}
