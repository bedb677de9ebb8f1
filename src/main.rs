use anyhow::Result;
use clap::{Parser, ValueEnum};
use neuro_snake::game::{GameConfig, IdleTimeout};
use neuro_snake::modes::{ControllerKind, EvaluateConfig, EvaluateMode, HumanMode, WatchMode};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "neuro_snake")]
#[command(version, about = "Snake simulation for learned controllers")]
struct Cli {
    /// Execution mode
    #[arg(long, value_enum, default_value = "human")]
    mode: Mode,

    /// JSON game config; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width in cells
    #[arg(long)]
    width: Option<usize>,

    /// Grid height in cells
    #[arg(long)]
    height: Option<usize>,

    /// Starting snake length
    #[arg(long)]
    initial_length: Option<usize>,

    /// Seed for food placement and built-in controllers
    #[arg(long)]
    seed: Option<u64>,

    /// End an episode after this many ticks without food
    #[arg(long, conflicts_with = "wall_clock_timeout")]
    idle_ticks: Option<u32>,

    /// End an episode after this many seconds without food
    #[arg(long)]
    wall_clock_timeout: Option<f64>,

    /// Controller used by watch and evaluate modes
    #[arg(long, value_enum, default_value = "random")]
    controller: ControllerKind,

    /// Controllers per evaluation round
    #[arg(long, default_value = "50")]
    population: usize,

    /// Evaluation rounds
    #[arg(long, default_value = "10")]
    rounds: usize,

    /// Hard cap on ticks per evaluated episode
    #[arg(long)]
    tick_limit: Option<u64>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Play snake with keyboard controls
    Human,
    /// Watch a built-in controller play
    Watch,
    /// Evaluate a population of controllers headlessly
    Evaluate,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(length) = self.initial_length {
            config.initial_snake_length = length;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(limit) = self.idle_ticks {
            config.idle_timeout = IdleTimeout::Ticks { limit };
        }
        if let Some(seconds) = self.wall_clock_timeout {
            config.idle_timeout = IdleTimeout::WallClock { seconds };
        }

        config.validate()?;
        Ok(config)
    }
}

/// Log to stderr; TUI modes default to warnings only so the screen stays clean
fn init_tracing(mode: Mode) {
    let default_level = match mode {
        Mode::Evaluate => "info",
        Mode::Human | Mode::Watch => "warn",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.mode);

    let config = cli.game_config()?;

    match cli.mode {
        Mode::Human => {
            let mut human_mode = HumanMode::new(config)?;
            human_mode.run().await?;
        }
        Mode::Watch => {
            let controller = cli.controller.build(config.seed.unwrap_or_else(rand::random));
            let mut watch_mode = WatchMode::new(config, controller)?;
            watch_mode.run().await?;
        }
        Mode::Evaluate => {
            let mut evaluate_config =
                EvaluateConfig::new(cli.population, cli.rounds, cli.controller);
            evaluate_config.game_config = config;
            evaluate_config.tick_limit = cli.tick_limit;

            // Blocking rayon work
            tokio::task::spawn_blocking(move || EvaluateMode::new(evaluate_config).run()).await??;
        }
    }

    Ok(())
}
