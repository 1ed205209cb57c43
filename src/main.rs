//! topbar: prints a one-line system status for desktop bars.
//!
//! Run with:  `RUST_LOG=info topbar | lemonbar`

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};
use topbar_config::TopbarConfig;
use topbar_system::{AudioSampler, Direction, Monitor};
use topbar_widgets::StatusLine;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "topbar", version, about = "Prints a one-line system status for desktop bars")]
struct Cli {
    /// Config file [default: $XDG_CONFIG_HOME/topbar/topbar.toml]
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a status line every tick until interrupted (default)
    Run,
    /// Print a single status line and exit
    Once,
    /// Set the speaker level, 0-100
    SetVolume {
        #[arg(allow_negative_numbers = true)]
        percent: i64,
    },
    /// Set the microphone level, 0-100
    SetMic {
        #[arg(allow_negative_numbers = true)]
        percent: i64,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only status lines.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = topbar_config::load(cli.config.unwrap_or_else(topbar_config::default_path))?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run(&config).await,
        Command::Once => once(&config).await,
        Command::SetVolume { percent } => set_level("volume", Direction::Playback, percent),
        Command::SetMic { percent } => set_level("microphone", Direction::Capture, percent),
    }
}

/// Tick at the configured interval until Ctrl-C or until stdout goes away.
async fn run(config: &TopbarConfig) -> Result<()> {
    info!("topbar v{} starting", env!("CARGO_PKG_VERSION"));

    let mut monitor = Monitor::new(&config.smoothing);
    let line = StatusLine::from_config(config);

    let mut ticker = time::interval(Duration::from_millis(config.global.interval_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The CPU baseline was just taken; wait one period for a real delta.
    ticker.reset();

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let state = monitor.tick();
                if let Err(e) = print_line(&line.render(&state)) {
                    warn!("stdout closed ({e}); exiting");
                    break;
                }
            }
            res = &mut shutdown => {
                if let Err(e) = res {
                    error!("Cannot listen for Ctrl-C: {e}");
                }
                info!("Shutting down");
                break;
            }
        }
    }

    Ok(())
}

async fn once(config: &TopbarConfig) -> Result<()> {
    let mut monitor = Monitor::new(&config.smoothing);
    time::sleep(Duration::from_millis(config.global.interval_ms)).await;

    let line = StatusLine::from_config(config);
    print_line(&line.render(&monitor.tick()))?;
    Ok(())
}

fn set_level(name: &'static str, direction: Direction, percent: i64) -> Result<()> {
    AudioSampler::open(direction)?.set_level(percent)?;
    info!("{name} set to {percent}%");
    Ok(())
}

fn print_line(text: &str) -> std::io::Result<()> {
    let mut out = std::io::stdout().lock();
    writeln!(out, "{text}")?;
    out.flush()
}
