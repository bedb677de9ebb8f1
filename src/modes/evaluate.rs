//! Headless evaluation mode
//!
//! Plays rounds of a population of built-in controllers in parallel and
//! prints fitness statistics, the way a fitness-based trainer would consume
//! them.
//!
//! # Example
//!
//! ```rust,ignore
//! use neuro_snake::modes::{ControllerKind, EvaluateConfig, EvaluateMode};
//!
//! let config = EvaluateConfig::new(50, 10, ControllerKind::Linear);
//! let mut mode = EvaluateMode::new(config);
//! mode.run()?;
//! ```

use anyhow::{Context, Result};
use rand::random;
use tracing::info;

use super::{BuiltinController, ControllerKind};
use crate::agent::{evaluate_population, EpisodeDriver, EpisodeReport};
use crate::game::GameConfig;
use crate::metrics::EvaluationStats;

/// Configuration for evaluation mode
#[derive(Debug, Clone)]
pub struct EvaluateConfig {
    /// Controllers evaluated per round
    pub population: usize,

    pub rounds: usize,

    pub controller: ControllerKind,

    pub game_config: GameConfig,

    /// Driver-side cap on episode length; `None` lets the idle timeout decide
    pub tick_limit: Option<u64>,
}

impl EvaluateConfig {
    pub fn new(population: usize, rounds: usize, controller: ControllerKind) -> Self {
        Self {
            population,
            rounds,
            controller,
            game_config: GameConfig::default(),
            tick_limit: None,
        }
    }
}

pub struct EvaluateMode {
    config: EvaluateConfig,
    driver: EpisodeDriver,
    stats: EvaluationStats,
    /// Base for controller and board seeds
    seed: u64,
}

impl EvaluateMode {
    pub fn new(config: EvaluateConfig) -> Self {
        let seed = config.game_config.seed.unwrap_or_else(random);
        let driver = EpisodeDriver::new().tick_limit(config.tick_limit);
        let stats = EvaluationStats::new(config.population.max(1));

        Self {
            config,
            driver,
            stats,
            seed,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        self.print_header();

        for round in 0..self.config.rounds {
            let reports = self.run_round(round)?;
            self.stats.record_all(&reports);

            let best = reports.iter().map(EpisodeReport::fitness).max();
            info!(
                round = round + 1,
                best_fitness = ?best,
                mean_fitness = self.stats.mean_fitness(),
                "round evaluated"
            );
            self.print_progress(round + 1);
        }

        println!("\nEvaluation complete!");
        println!("\nFinal Statistics:");
        println!("{}", self.stats.format_summary());

        Ok(())
    }

    /// One episode for every member of a freshly built population
    fn run_round(&self, round: usize) -> Result<Vec<EpisodeReport>> {
        let offset = (round * self.config.population) as u64;
        let round_seed = self.seed.wrapping_add(offset);

        let controllers: Vec<BuiltinController> = (0..self.config.population as u64)
            .map(|i| self.config.controller.build(round_seed.wrapping_add(i)))
            .collect();
        let game_config = self.config.game_config.clone().with_seed(round_seed);

        evaluate_population(&game_config, controllers, &self.driver)
            .with_context(|| format!("Failed to evaluate round {}", round + 1))
    }

    fn print_header(&self) {
        let game = &self.config.game_config;
        println!("{}", "=".repeat(70));
        println!("Population Evaluation - Neuro Snake");
        println!("{}", "=".repeat(70));
        println!("Controller: {:?}", self.config.controller);
        println!("Population: {}", self.config.population);
        println!("Rounds: {}", self.config.rounds);
        println!("Game Config: {}x{} grid", game.grid_width, game.grid_height);
        println!("  Initial length: {}", game.initial_snake_length);
        println!("  Idle timeout: {:?}", game.idle_timeout);
        match self.config.tick_limit {
            Some(limit) => println!("  Tick limit: {}", limit),
            None => println!("  Tick limit: none"),
        }
        println!("Seed: {}", self.seed);
        println!("{}", "=".repeat(70));
        println!();
    }

    fn print_progress(&self, round: usize) {
        println!(
            "[Round {}/{}] {}",
            round,
            self.config.rounds,
            self.stats.format_summary()
        );
    }
}
