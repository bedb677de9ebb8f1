pub mod evaluate;
pub mod human;
pub mod tui;
pub mod watch;

pub use evaluate::{EvaluateConfig, EvaluateMode};
pub use human::HumanMode;
pub use watch::WatchMode;

use clap::ValueEnum;

use crate::agent::{Controller, LinearNetwork, NetworkController, RandomController};
use crate::game::{Action, Observation};

/// Built-in controllers selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ControllerKind {
    /// Uniformly random moves
    Random,
    /// Randomly initialised linear network read through the network adapter
    Linear,
}

impl ControllerKind {
    pub fn build(self, seed: u64) -> BuiltinController {
        match self {
            ControllerKind::Random => BuiltinController::Random(RandomController::new(seed)),
            ControllerKind::Linear => {
                BuiltinController::Linear(NetworkController::new(LinearNetwork::random(seed)))
            }
        }
    }
}

pub enum BuiltinController {
    Random(RandomController),
    Linear(NetworkController<LinearNetwork>),
}

impl Controller for BuiltinController {
    fn decide(&mut self, observation: &Observation) -> Action {
        match self {
            BuiltinController::Random(controller) => controller.decide(observation),
            BuiltinController::Linear(controller) => controller.decide(observation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_controllers_are_seeded() {
        let obs = Observation([3.0, 2.0]);
        for kind in [ControllerKind::Random, ControllerKind::Linear] {
            let mut a = kind.build(12);
            let mut b = kind.build(12);
            for _ in 0..10 {
                assert_eq!(a.decide(&obs), b.decide(&obs));
            }
        }
    }
}
