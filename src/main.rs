use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use snake_ai::agent::{Agent, GreedyAgent, RandomAgent};
use snake_ai::game::GameConfig;
use snake_ai::modes::{BenchConfig, BenchMode, HumanMode, WatchMode};

#[derive(Parser)]
#[command(name = "snake_ai")]
#[command(version, about = "Step-driven Snake for agent control")]
struct Cli {
    /// Game mode
    #[arg(long, default_value = "watch")]
    mode: Mode,

    /// Agent driving the snake in watch and bench modes
    #[arg(long, default_value = "greedy")]
    agent: AgentKind,

    /// JSON game configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Field width in pixels
    #[arg(long)]
    width: Option<i32>,

    /// Field height in pixels
    #[arg(long)]
    height: Option<i32>,

    /// Grid cell size in pixels
    #[arg(long)]
    block_size: Option<i32>,

    /// Ticks per second at full speed
    #[arg(long)]
    speed: Option<u32>,

    /// Seed for food placement and the random agent
    #[arg(long)]
    seed: Option<u64>,

    /// Episodes to play in bench mode
    #[arg(long, default_value = "100")]
    episodes: usize,

    /// Log bench progress every N episodes
    #[arg(long, default_value = "10")]
    log_frequency: usize,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Play with the keyboard
    Human,
    /// Watch an agent play in the terminal
    Watch,
    /// Run episodes headless and report statistics
    Bench,
}

#[derive(Clone, ValueEnum)]
enum AgentKind {
    Random,
    Greedy,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(block_size) = self.block_size {
            config.block_size = block_size;
        }
        if let Some(speed) = self.speed {
            config.speed = speed;
        }
        if self.seed.is_some() {
            config.rng_seed = self.seed;
        }
        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }

    fn build_agent(&self) -> Box<dyn Agent> {
        match self.agent {
            AgentKind::Random => Box::new(RandomAgent::new(self.seed)),
            AgentKind::Greedy => Box::new(GreedyAgent::new()),
        }
    }
}

/// Where log events go
#[derive(Debug, PartialEq)]
enum LogTarget<'a> {
    File(&'a PathBuf),
    Stderr,
    Discard,
}

/// The terminal modes draw on stderr, so without a log file their events
/// are discarded instead of printed over the board.
fn log_target(log_file: Option<&PathBuf>, mode: Mode) -> LogTarget<'_> {
    match (log_file, mode) {
        (Some(path), _) => LogTarget::File(path),
        (None, Mode::Human | Mode::Watch) => LogTarget::Discard,
        (None, Mode::Bench) => LogTarget::Stderr,
    }
}

fn init_tracing(log_file: Option<&PathBuf>, mode: Mode) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match log_target(log_file, mode) {
        LogTarget::File(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {:?}", path))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::Discard => builder.with_writer(std::io::sink).try_init(),
    };
    installed.map_err(|err| anyhow!("Failed to install tracing subscriber: {err}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_ref(), cli.mode)?;

    let config = cli.game_config()?;
    info!(?config, "starting");

    match cli.mode {
        Mode::Human => {
            let mut human_mode = HumanMode::new(config)?;
            human_mode.run().await?;
        }
        Mode::Watch => {
            let mut watch_mode = WatchMode::new(config, cli.build_agent())?;
            watch_mode.run().await?;
        }
        Mode::Bench => {
            let mut bench_config = BenchConfig::new(cli.episodes);
            bench_config.log_frequency = cli.log_frequency;
            bench_config.game_config = config;
            let mut bench_mode = BenchMode::new(bench_config, cli.build_agent())?;
            bench_mode.run()?;
        }
    }

    Ok(())
}
