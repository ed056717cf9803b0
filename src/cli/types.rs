use clap::Subcommand;

#[derive(Subcommand, Debug, Clone)]
pub enum PrefsArgs {
    /// Print current preferences
    Show {},
    /// Change one or more preferences
    Set {
        /// Only list mp4 formats
        #[clap(long)]
        only_mp4: Option<bool>,

        /// Only list formats that carry both audio and video
        #[clap(long)]
        only_muxed: Option<bool>,

        /// Hide HLS/DASH formats
        #[clap(long)]
        hide_streaming: Option<bool>,

        /// Analyze shared links right away
        #[clap(long)]
        auto_analyze_on_share: Option<bool>,
    },
    /// Restore defaults
    Reset {},
}
