use clap::{Parser, Subcommand};

mod handlers;
mod render;
mod types;

pub use handlers::*;
pub use types::*;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a media link and list downloadable formats.
    /// Ctrl-C cancels the request.
    Extract {
        /// A url. Bare domains like `youtube.com/watch?v=…` are accepted.
        /// Use `-` to read a pasted url from stdin.
        #[clap(allow_hyphen_values = true)]
        url: String,

        /// Print the result as json
        #[clap(long, default_value = "false")]
        json: bool,
    },
    /// Handle text shared from another app. Analyzes the first link found
    /// when `auto_analyze_on_share` is enabled.
    Share {
        #[clap(allow_hyphen_values = true)]
        text: String,

        /// Print the result as json
        #[clap(long, default_value = "false")]
        json: bool,
    },
    /// Build a proxy download link without analyzing the source first.
    Link {
        /// The analyzed page url
        source: String,

        /// Format id as reported by `extract`
        format_id: String,

        /// Link to the mp3 conversion endpoint instead
        #[clap(long, default_value = "false")]
        mp3: bool,
    },
    /// Recently analyzed links.
    History {
        /// Forget all entries
        #[clap(long, default_value = "false")]
        clear: bool,
    },
    /// Show or change format filters.
    Prefs {
        #[clap(subcommand)]
        action: Option<PrefsArgs>,
    },
    /// Check that the extraction server is reachable.
    Status {},
}
