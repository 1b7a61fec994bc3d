// SPDX-License-Identifier: GPL-3.0-only

use clap::{CommandFactory, Parser};
use depth_replay::backends::DirectorySource;
use depth_replay::config::{Config, parse_reduction_factor};
use depth_replay::skeleton::tracker::CentroidTracker;
use depth_replay::PlaybackController;
use std::path::PathBuf;
use tracing::info;

mod cli;

#[derive(Parser)]
#[command(name = "depth-replay")]
#[command(about = "Replay recorded depth frames and inspect tracked skeleton joints")]
#[command(version = env!("GIT_VERSION"))]
struct Cli {
    /// Directory of raw 16-bit depth frames, played in file name order
    frame_directory: Option<PathBuf>,

    /// Downsampling stride applied before tracking (positive integer)
    reduction_factor: Option<String>,

    /// Configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Track every frame and write annotated PNGs to this directory instead of opening the viewer
    #[arg(short, long)]
    export: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=depth_replay=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    let (Some(directory), Some(factor)) = (cli.frame_directory, cli.reduction_factor) else {
        println!("{}", Cli::command().render_usage());
        return Ok(());
    };

    let reduction_factor = parse_reduction_factor(&factor)?;
    let config = Config::load_or_default(cli.config.as_deref())?;

    let mut player = PlaybackController::new(&config, reduction_factor)?
        .with_tracker(Box::new(CentroidTracker::new()));
    let count = player.load(&DirectorySource::new(&directory))?;
    info!(directory = %directory.display(), count, reduction_factor, "Session loaded");

    match cli.export {
        Some(output) => cli::export_all(&mut player, &config, &output),
        None => depth_replay::terminal::run(player, &config),
    }
}
