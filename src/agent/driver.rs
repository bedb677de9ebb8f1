//! Running one episode from reset to termination
//!
//! The driver is shared by every automated path (headless evaluation and the
//! watch mode's step-at-a-time loop). It owns no simulation state of its own.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::controller::Controller;
use crate::game::{Action, Clock, SimulationError, SnakeSimulation, Termination};

/// Drops an immediate reversal into the snake's own neck
///
/// If the chosen action is the opposite of the previous tick's action, the
/// previous action is repeated instead. The first action always passes.
#[derive(Debug, Clone, Default)]
pub struct AntiReversal {
    previous: Option<Action>,
}

impl AntiReversal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&mut self, action: Action) -> Action {
        let chosen = match self.previous {
            Some(previous) if previous.opposite() == action => previous,
            _ => action,
        };
        self.previous = Some(chosen);
        chosen
    }

    pub fn previous(&self) -> Option<Action> {
        self.previous
    }

    pub fn clear(&mut self) {
        self.previous = None;
    }
}

/// Summary of a finished episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeReport {
    /// Final score, penalties included
    pub score: i32,
    /// Idle timeouts during this episode (0 or 1)
    pub apple_penalty: u32,
    pub ticks: u64,
    pub food_eaten: u32,
    /// `None` when the episode was cut off by the driver's tick limit
    pub termination: Option<Termination>,
}

impl EpisodeReport {
    /// Scalar handed back to the training framework: score plus apple penalty
    pub fn fitness(&self) -> i64 {
        self.score as i64 + self.apple_penalty as i64
    }
}

/// Runs episodes against a [`Controller`]
#[derive(Debug, Clone)]
pub struct EpisodeDriver {
    anti_reversal: bool,
    tick_limit: Option<u64>,
}

impl Default for EpisodeDriver {
    fn default() -> Self {
        Self {
            anti_reversal: true,
            tick_limit: None,
        }
    }
}

impl EpisodeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the anti-reversal smoothing rule
    pub fn anti_reversal(mut self, enabled: bool) -> Self {
        self.anti_reversal = enabled;
        self
    }

    /// Stop an episode after this many ticks even if it has not ended
    pub fn tick_limit(mut self, limit: Option<u64>) -> Self {
        self.tick_limit = limit;
        self
    }

    /// Reset `sim` and play it until done, asking `controller` each tick
    pub fn run_episode<C, K>(
        &self,
        sim: &mut SnakeSimulation<C>,
        controller: &mut K,
    ) -> Result<EpisodeReport, SimulationError>
    where
        C: Clock,
        K: Controller + ?Sized,
    {
        let penalty_before = sim.apple_penalty();
        let mut observation = sim.reset();
        let mut smoothing = AntiReversal::new();
        let mut termination = None;

        loop {
            if self.tick_limit.is_some_and(|limit| sim.ticks() >= limit) {
                debug!(ticks = sim.ticks(), "episode cut off by tick limit");
                break;
            }

            let mut action = controller.decide(&observation);
            if self.anti_reversal {
                action = smoothing.filter(action);
            }

            let result = sim.step(action)?;
            observation = result.observation;
            if result.done {
                termination = result.info.termination;
                break;
            }
        }

        let report = EpisodeReport {
            score: sim.score(),
            apple_penalty: sim.apple_penalty() - penalty_before,
            ticks: sim.ticks(),
            food_eaten: sim.food_eaten(),
            termination,
        };
        debug!(?report, fitness = report.fitness(), "episode finished");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, IdleTimeout, Observation};

    #[test]
    fn test_anti_reversal_substitutes_previous() {
        let mut filter = AntiReversal::new();

        assert_eq!(filter.filter(Action::Right), Action::Right);
        assert_eq!(filter.filter(Action::Left), Action::Right);
        assert_eq!(filter.filter(Action::Up), Action::Up);
        assert_eq!(filter.filter(Action::Down), Action::Up);
        assert_eq!(filter.filter(Action::Left), Action::Left);
        assert_eq!(filter.previous(), Some(Action::Left));

        filter.clear();
        assert_eq!(filter.filter(Action::Right), Action::Right);
    }

    #[test]
    fn test_anti_reversal_first_action_passes() {
        for action in Action::ALL {
            assert_eq!(AntiReversal::new().filter(action), action);
        }
    }

    #[test]
    fn test_run_into_wall() {
        let mut sim = SnakeSimulation::new(GameConfig::small().with_seed(4)).unwrap();
        let mut controller = |_: &Observation| Action::Up;

        let report = EpisodeDriver::new()
            .run_episode(&mut sim, &mut controller)
            .unwrap();

        // From (5,5) upward, the sixth move leaves the grid unless food is eaten on the way
        assert_eq!(report.termination, Some(Termination::Wall));
        assert_eq!(report.score, report.food_eaten as i32 - 1);
        assert_eq!(report.apple_penalty, 0);
        assert!(sim.is_over());
    }

    #[test]
    fn test_reversal_smoothing_prevents_neck_bite() {
        let config = GameConfig::small()
            .with_seed(8)
            .with_idle_timeout(IdleTimeout::Ticks { limit: 3 });
        let mut sim = SnakeSimulation::new(config).unwrap();
        let mut flip = false;
        let mut controller = |_: &Observation| {
            flip = !flip;
            if flip {
                Action::Left
            } else {
                Action::Right
            }
        };

        let report = EpisodeDriver::new()
            .run_episode(&mut sim, &mut controller)
            .unwrap();

        // Every "Right" is replaced by "Left", so the snake heads for the left wall
        assert!(matches!(
            report.termination,
            Some(Termination::Wall) | Some(Termination::IdleTimeout)
        ));
        assert_ne!(report.termination, Some(Termination::SelfCollision));
    }

    #[test]
    fn test_idle_timeout_counts_into_fitness() {
        let config = GameConfig::new(20, 20)
            .with_seed(2)
            .with_idle_timeout(IdleTimeout::Ticks { limit: 3 });
        let mut sim = SnakeSimulation::new(config).unwrap();
        // Circle in a 2x2 square; a single-segment snake never bites itself
        let moves = [Action::Right, Action::Down, Action::Left, Action::Up];
        let mut i = 0;
        let mut controller = |_: &Observation| {
            let action = moves[i % moves.len()];
            i += 1;
            action
        };

        let report = EpisodeDriver::new()
            .run_episode(&mut sim, &mut controller)
            .unwrap();

        assert_eq!(report.termination, Some(Termination::IdleTimeout));
        assert_eq!(report.apple_penalty, 1);
        assert_eq!(report.fitness(), report.score as i64 + 1);
    }

    #[test]
    fn test_apple_penalty_is_per_episode() {
        let config = GameConfig::new(20, 20)
            .with_seed(2)
            .with_idle_timeout(IdleTimeout::Ticks { limit: 1 });
        let mut sim = SnakeSimulation::new(config).unwrap();
        let driver = EpisodeDriver::new();
        let moves = [Action::Right, Action::Down, Action::Left, Action::Up];
        let mut i = 0;
        let mut controller = |_: &Observation| {
            let action = moves[i % moves.len()];
            i += 1;
            action
        };

        let first = driver.run_episode(&mut sim, &mut controller).unwrap();
        let second = driver.run_episode(&mut sim, &mut controller).unwrap();

        assert!(first.apple_penalty <= 1);
        assert!(second.apple_penalty <= 1);
        assert_eq!(
            sim.apple_penalty(),
            first.apple_penalty + second.apple_penalty
        );
    }

    #[test]
    fn test_tick_limit_cuts_episode() {
        let config = GameConfig::new(20, 20)
            .with_seed(2)
            .with_idle_timeout(IdleTimeout::Ticks { limit: 1000 });
        let mut sim = SnakeSimulation::new(config).unwrap();
        let moves = [Action::Right, Action::Down, Action::Left, Action::Up];
        let mut i = 0;
        let mut controller = |_: &Observation| {
            let action = moves[i % moves.len()];
            i += 1;
            action
        };

        let report = EpisodeDriver::new()
            .tick_limit(Some(10))
            .run_episode(&mut sim, &mut controller)
            .unwrap();

        assert_eq!(report.termination, None);
        assert_eq!(report.ticks, 10);
        assert!(!sim.is_over());
    }

    #[test]
    fn test_fitness_sums_score_and_penalty() {
        let report = EpisodeReport {
            score: -1,
            apple_penalty: 1,
            ticks: 40,
            food_eaten: 0,
            termination: Some(Termination::IdleTimeout),
        };
        assert_eq!(report.fitness(), 0);
    }
}
