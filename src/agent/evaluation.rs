//! Parallel fitness evaluation
//!
//! Every controller gets its own simulation on a rayon worker; nothing is
//! shared between workers and results come back in input order.

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

use super::controller::Controller;
use super::driver::{EpisodeDriver, EpisodeReport};
use crate::game::{ConfigError, GameConfig, SimulationError, SnakeSimulation};

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("invalid game config: {0}")]
    Config(#[from] ConfigError),
    #[error("simulation misuse: {0}")]
    Simulation(#[from] SimulationError),
}

/// Config for the `index`-th worker; seeded configs get a distinct seed per worker
fn worker_config(config: &GameConfig, index: usize) -> GameConfig {
    let mut worker = config.clone();
    worker.seed = config.seed.map(|seed| seed.wrapping_add(index as u64));
    worker
}

/// Play one episode per controller, concurrently
pub fn evaluate_population<K>(
    config: &GameConfig,
    controllers: Vec<K>,
    driver: &EpisodeDriver,
) -> Result<Vec<EpisodeReport>, EvaluationError>
where
    K: Controller + Send,
{
    config.validate()?;
    let population = controllers.len();

    let reports = controllers
        .into_par_iter()
        .enumerate()
        .map(|(index, mut controller)| -> Result<EpisodeReport, EvaluationError> {
            let mut sim = SnakeSimulation::new(worker_config(config, index))?;
            let report = driver.run_episode(&mut sim, &mut controller)?;
            debug!(index, fitness = report.fitness(), "controller evaluated");
            Ok(report)
        })
        .collect::<Result<Vec<_>, EvaluationError>>()?;

    info!(population, "population evaluated");
    Ok(reports)
}

/// Play `episodes` episodes with one controller on one simulation
pub fn evaluate_controller<K>(
    config: &GameConfig,
    controller: &mut K,
    driver: &EpisodeDriver,
    episodes: usize,
) -> Result<Vec<EpisodeReport>, EvaluationError>
where
    K: Controller + ?Sized,
{
    let mut sim = SnakeSimulation::new(config.clone())?;
    let mut reports = Vec::with_capacity(episodes);
    for _ in 0..episodes {
        reports.push(driver.run_episode(&mut sim, controller)?);
    }
    Ok(reports)
}
