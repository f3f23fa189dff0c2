//! CLI module for CubeAI
//!
//! Provides the operator commands:
//! - `chat`: send a message to the assistant
//! - `status`: probe the service health endpoint
//! - `animate`: run the timeline animation for a number of ticks
//! - `holoocean`: smoke-test the simulation sidecar connection
//! - `bump-version`: increment the version/build number in the config

use clap::{Parser, Subcommand};

pub mod animate;
pub mod bump_version;
pub mod chat;
pub mod holoocean;
pub mod status;

/// CubeAI client CLI
#[derive(Parser, Debug)]
#[command(name = "cubeai")]
#[command(about = "CubeAI oceanographic data assistant client")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a chat message to the assistant
    Chat {
        /// The message to send
        message: String,
        /// Viewing area to report in the filters
        #[arg(long)]
        area: Option<String>,
        /// Forecast model to report in the filters
        #[arg(long)]
        model: Option<String>,
        /// Parameter to report in the filters (salinity, temperature, ...)
        #[arg(long)]
        parameter: Option<String>,
    },
    /// Probe the service health endpoint and print the status
    Status,
    /// Run the animation timeline and print frame positions
    Animate {
        /// Total frames in the dataset
        #[arg(long, default_value_t = 24)]
        frames: usize,
        /// Playback speed multiplier
        #[arg(long)]
        speed: Option<f64>,
        /// Number of ticks to run
        #[arg(long, default_value_t = 30)]
        ticks: usize,
    },
    /// Connect to the HoloOcean sidecar and print incoming sensor frames
    Holoocean {
        /// Number of frames to wait for
        #[arg(long, default_value_t = 5)]
        frames: usize,
    },
    /// Increment the version in the app config
    BumpVersion {
        /// Only increment the build number
        #[arg(long)]
        build: bool,
        /// Config file to rewrite (defaults to the user config path)
        #[arg(long)]
        path: Option<std::path::PathBuf>,
    },
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Chat {
            message,
            area,
            model,
            parameter,
        }) => chat::run(&message, area, model, parameter).await,
        Some(Commands::Status) => status::run().await,
        Some(Commands::Animate {
            frames,
            speed,
            ticks,
        }) => animate::run(frames, speed, ticks).await,
        Some(Commands::Holoocean { frames }) => holoocean::run(frames).await,
        Some(Commands::BumpVersion { build, path }) => bump_version::run(build, path),
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}
