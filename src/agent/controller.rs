use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game::{Action, Observation};

/// Anything that picks an action from an observation once per tick
///
/// Human-driven adapters, trained networks and scripted test policies all sit
/// behind this one method; the simulation never sees what is behind it.
pub trait Controller {
    fn decide(&mut self, observation: &Observation) -> Action;
}

impl<F> Controller for F
where
    F: FnMut(&Observation) -> Action,
{
    fn decide(&mut self, observation: &Observation) -> Action {
        self(observation)
    }
}

/// Picks one of the four actions uniformly at random
#[derive(Debug, Clone)]
pub struct RandomController {
    rng: StdRng,
}

impl RandomController {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Controller for RandomController {
    fn decide(&mut self, _observation: &Observation) -> Action {
        Action::ALL[self.rng.gen_range(0..Action::ALL.len())]
    }
}
