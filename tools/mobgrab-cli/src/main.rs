//! mobgrab CLI: drive a device app while capturing its screen and audio.
//!
//! Usage:
//!   mobgrab screen [OPTIONS]      Record the screen while browsing the feed
//!   mobgrab audio [OPTIONS]       Record audio while browsing the feed
//!   mobgrab av [OPTIONS]          Record screen + audio and merge them
//!   mobgrab download [OPTIONS]    Save the current item in-app and pull it

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mobgrab_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "mobgrab",
    about = "Automated device capture: screen/audio recording, merging, and artifact extraction",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Automation server URL (overrides config)
    #[arg(long, global = true)]
    server: Option<String>,

    /// Device serial (overrides config)
    #[arg(long, global = true)]
    device: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record the device screen while swiping through the feed
    Screen {
        /// Recording duration in seconds
        #[arg(short, long)]
        duration: Option<u64>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Artifact name prefix
        #[arg(long, default_value = "capture")]
        prefix: String,

        /// Skip the swipe to the next item
        #[arg(long)]
        no_swipe: bool,
    },

    /// Record device or host audio while swiping through the feed
    Audio {
        /// Recording duration in seconds
        #[arg(short, long)]
        duration: Option<u64>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Artifact name prefix
        #[arg(long, default_value = "capture")]
        prefix: String,

        /// Capture from a host audio input instead of the device stream
        #[arg(long)]
        host_device: Option<String>,

        /// Skip the swipe to the next item
        #[arg(long)]
        no_swipe: bool,
    },

    /// Record screen and audio simultaneously, then merge into one file
    Av {
        /// Recording duration in seconds
        #[arg(short, long)]
        duration: Option<u64>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Artifact name prefix
        #[arg(long, default_value = "capture")]
        prefix: String,

        /// Skip the swipe to the next item
        #[arg(long)]
        no_swipe: bool,
    },

    /// Save the current item through the app's share sheet and pull it
    Download {
        /// Audio recording duration in seconds
        #[arg(short, long)]
        duration: Option<u64>,

        /// Local directory for pulled artifacts
        #[arg(short, long, default_value = "./device_media")]
        output: PathBuf,

        /// Artifact name prefix
        #[arg(long, default_value = "capture")]
        prefix: String,

        /// Remote directory to pull (overrides config)
        #[arg(long)]
        remote_dir: Option<String>,

        /// Skip the swipe to the next item
        #[arg(long)]
        no_swipe: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load();

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    mobgrab_common::logging::init_logging(&logging);

    if let Some(server) = cli.server {
        config.driver.server_url = server;
    }
    if let Some(device) = cli.device {
        config.driver.device_name = device;
    }

    match cli.command {
        Commands::Screen {
            duration,
            output,
            prefix,
            no_swipe,
        } => commands::screen::run(&config, duration, output, prefix, !no_swipe).await,
        Commands::Audio {
            duration,
            output,
            prefix,
            host_device,
            no_swipe,
        } => commands::audio::run(&config, duration, output, prefix, host_device, !no_swipe).await,
        Commands::Av {
            duration,
            output,
            prefix,
            no_swipe,
        } => commands::av::run(&config, duration, output, prefix, !no_swipe).await,
        Commands::Download {
            duration,
            output,
            prefix,
            remote_dir,
            no_swipe,
        } => commands::download::run(&config, duration, output, prefix, remote_dir, !no_swipe).await,
    }
}
