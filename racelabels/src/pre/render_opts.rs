use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[clap(
    version = "0.1.0",
    author = "Alexander Heilmeier <alexander.heilmeier@tum.de>",
    name = "racelabels",
    about = "Renders broadcast overlay labels from race telemetry snapshots"
)]
pub struct RenderOpts {
    // FLAGS ---------------------------------------------------------------------------------------
    /// Activate debug logging
    #[clap(short, long)]
    pub debug: bool,

    // OPTIONS -------------------------------------------------------------------------------------
    /// Set path to the theme file
    #[clap(short, long)]
    pub theme_path: PathBuf,

    /// Set paths to the snapshot files, they are rendered as consecutive ticks
    #[clap(short, long, required = true, multiple_values = true)]
    pub snapshot_paths: Vec<PathBuf>,

    /// Set path to the external driver data file (; separated)
    #[clap(long)]
    pub data_path: Option<PathBuf>,

    /// Set path to the external team data file (; separated)
    #[clap(long)]
    pub teams_path: Option<PathBuf>,

    /// Set path of the JSON report file, labels are printed to the console if not set
    #[clap(short, long)]
    pub output_path: Option<PathBuf>,
}
