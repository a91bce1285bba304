//! rrreplay: headless player for exported Rapid Router animation queues
//!
//! Architecture:
//!   replay.rs    : level/queue loading and the playback loop
//!   log_stage.rs : stage that narrates playback through tracing
//!   audio.rs     : silent backend, rodio device backend (feature "rodio")

mod audio;
mod log_stage;
mod replay;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rapidrouter_animation::{AppConfig, Audio, SoundBoard};
use tracing_subscriber::EnvFilter;

use crate::audio::SilentAudio;
use crate::log_stage::LogStage;

#[derive(Parser)]
#[command(name = "rrreplay")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Replay exported Rapid Router animation queues", long_about = None)]
struct Cli {
    /// Enable debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a queue against the logging stage
    Play {
        /// Level description (JSON)
        level: PathBuf,
        /// Exported animation queue (JSON)
        queue: PathBuf,
        /// Wait out every animation in wall-clock time
        #[arg(long)]
        realtime: bool,
        /// Start with sound muted
        #[arg(long)]
        mute: bool,
    },

    /// Import a queue and print it back in canonical form
    Check {
        level: PathBuf,
        queue: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AppConfig::default(),
    };

    let filter = if cli.verbose { "debug" } else { config.log_level.as_str() };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("rapidrouter={}", filter).parse()?)
                .add_directive(format!("rrreplay={}", filter).parse()?),
        )
        .init();

    tracing::info!("rrreplay v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Play {
            level,
            queue,
            realtime,
            mute,
        } => play(&config, &level, &queue, realtime, mute),
        Commands::Check { level, queue } => {
            let level = replay::load_level(&level)?;
            let json = read_queue(&queue)?;
            println!("{}", replay::normalize(&config, &level, &json)?);
            Ok(())
        }
    }
}

fn read_queue(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read queue {}", path.display()))
}

fn play(config: &AppConfig, level: &Path, queue: &Path, realtime: bool, mute: bool) -> Result<()> {
    let level = replay::load_level(level)?;
    let json = read_queue(queue)?;
    let board = SoundBoard::from_config(config);

    #[cfg(feature = "rodio")]
    if let Some(dir) = &config.sound_dir {
        match audio::DeviceAudio::new(dir.clone()) {
            Ok(device) => {
                let mut stage = LogStage::new(device);
                if mute {
                    board.mute(&mut stage);
                }
                let summary = replay::replay(config, &level, &json, &mut stage, realtime)?;
                return report(&summary, &stage);
            }
            Err(e) => tracing::warn!("Falling back to silent audio: {}", e),
        }
    }

    let mut stage = LogStage::new(SilentAudio::default());
    if mute {
        board.mute(&mut stage);
    }
    let summary = replay::replay(config, &level, &json, &mut stage, realtime)?;
    report(&summary, &stage)
}

fn report<A: Audio>(summary: &replay::Summary, stage: &LogStage<A>) -> Result<()> {
    println!(
        "{} timestamps, {} events, {} moves, {:.1}s",
        summary.timestamps,
        summary.events,
        stage.moves,
        summary.elapsed_ms as f64 / 1000.0
    );
    println!("Fuel needle at {}°", stage.needle);
    for line in &stage.transcript {
        println!("> {}", line);
    }
    if let Some(outcome) = stage.modals.last() {
        println!("Outcome: {}", outcome);
    }
    Ok(())
}
