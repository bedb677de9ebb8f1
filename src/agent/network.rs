//! Turning a network's output vector into a move
//!
//! The training framework's networks stay opaque: all this module needs is
//! something that maps the observation slice to one score per output.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::controller::Controller;
use crate::game::{Action, Observation, OBSERVATION_SIZE};

/// Which action each network output stands for
///
/// Output 0 steers left, 1 right, 2 up and 3 down. Networks evolved against
/// the legacy evaluation loop expect this layout.
pub const OUTPUT_LAYOUT: [Action; 4] = [Action::Left, Action::Right, Action::Up, Action::Down];

/// Number of outputs a controlling network must produce
pub const OUTPUT_SIZE: usize = OUTPUT_LAYOUT.len();

/// A feed-forward evaluation: inputs in, one activation per output
pub trait Network {
    fn activate(&self, inputs: &[f32]) -> Vec<f32>;
}

impl<F> Network for F
where
    F: Fn(&[f32]) -> Vec<f32>,
{
    fn activate(&self, inputs: &[f32]) -> Vec<f32> {
        self(inputs)
    }
}

/// Index of the largest output; the first one wins ties and NaNs are skipped
pub fn argmax(outputs: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &value) in outputs.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        match best {
            Some((_, top)) if value <= top => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Pick the action for the strongest output among the first [`OUTPUT_SIZE`]
pub fn action_from_outputs(outputs: &[f32]) -> Option<Action> {
    let considered = &outputs[..outputs.len().min(OUTPUT_SIZE)];
    argmax(considered).map(|idx| OUTPUT_LAYOUT[idx])
}

/// Controller backed by a [`Network`]
///
/// When the network produces nothing usable the last action is repeated.
pub struct NetworkController<N> {
    network: N,
    last: Action,
}

impl<N: Network> NetworkController<N> {
    pub fn new(network: N) -> Self {
        Self {
            network,
            last: Action::Right,
        }
    }

    pub fn network(&self) -> &N {
        &self.network
    }
}

impl<N: Network> Controller for NetworkController<N> {
    fn decide(&mut self, observation: &Observation) -> Action {
        let outputs = self.network.activate(observation.as_slice());
        if let Some(action) = action_from_outputs(&outputs) {
            self.last = action;
        }
        self.last
    }
}

/// Single-layer tanh network with random weights
///
/// A baseline stand-in for an evolved network, mainly useful for exercising
/// the evaluation pipeline from the command line.
#[derive(Debug, Clone)]
pub struct LinearNetwork {
    weights: [[f32; OBSERVATION_SIZE]; OUTPUT_SIZE],
    bias: [f32; OUTPUT_SIZE],
}

impl LinearNetwork {
    pub fn new(weights: [[f32; OBSERVATION_SIZE]; OUTPUT_SIZE], bias: [f32; OUTPUT_SIZE]) -> Self {
        Self { weights, bias }
    }

    /// Weights and biases drawn uniformly from [-1, 1)
    pub fn random(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut weights = [[0.0; OBSERVATION_SIZE]; OUTPUT_SIZE];
        let mut bias = [0.0; OUTPUT_SIZE];
        for row in weights.iter_mut() {
            for w in row.iter_mut() {
                *w = rng.gen_range(-1.0..1.0);
            }
        }
        for b in bias.iter_mut() {
            *b = rng.gen_range(-1.0..1.0);
        }
        Self { weights, bias }
    }
}

impl Network for LinearNetwork {
    fn activate(&self, inputs: &[f32]) -> Vec<f32> {
        self.weights
            .iter()
            .zip(self.bias.iter())
            .map(|(row, b)| {
                let sum: f32 = row.iter().zip(inputs.iter()).map(|(w, x)| w * x).sum();
                (sum + b).tanh()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax() {
        assert_eq!(argmax(&[0.1, 0.9, 0.3]), Some(1));
        assert_eq!(argmax(&[0.5, 0.5, 0.2]), Some(0));
        assert_eq!(argmax(&[f32::NAN, -2.0, -1.0]), Some(2));
        assert_eq!(argmax(&[f32::NAN]), None);
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_output_layout() {
        assert_eq!(action_from_outputs(&[1.0, 0.0, 0.0, 0.0]), Some(Action::Left));
        assert_eq!(action_from_outputs(&[0.0, 1.0, 0.0, 0.0]), Some(Action::Right));
        assert_eq!(action_from_outputs(&[0.0, 0.0, 1.0, 0.0]), Some(Action::Up));
        assert_eq!(action_from_outputs(&[0.0, 0.0, 0.0, 1.0]), Some(Action::Down));
    }

    #[test]
    fn test_extra_outputs_ignored() {
        assert_eq!(
            action_from_outputs(&[0.0, 0.0, 0.2, 0.1, 9.0]),
            Some(Action::Up)
        );
    }

    #[test]
    fn test_network_controller_falls_back_to_last_action() {
        let outputs = std::cell::RefCell::new(vec![vec![0.0, 0.0, 0.0, 1.0], vec![]]);
        let network = |_: &[f32]| outputs.borrow_mut().remove(0);
        let mut controller = NetworkController::new(network);
        let obs = Observation([1.0, 1.0]);

        assert_eq!(controller.decide(&obs), Action::Down);
        assert_eq!(controller.decide(&obs), Action::Down);
    }

    #[test]
    fn test_network_sees_observation() {
        let network = |inputs: &[f32]| {
            if inputs[0] > inputs[1] {
                vec![1.0, 0.0, 0.0, 0.0]
            } else {
                vec![0.0, 0.0, 1.0, 0.0]
            }
        };
        let mut controller = NetworkController::new(network);

        assert_eq!(controller.decide(&Observation([3.0, 1.0])), Action::Left);
        assert_eq!(controller.decide(&Observation([0.0, 4.0])), Action::Up);
    }

    #[test]
    fn test_linear_network() {
        let network = LinearNetwork::new(
            [[1.0, 0.0], [0.0, 1.0], [-1.0, 0.0], [0.0, -1.0]],
            [0.0; OUTPUT_SIZE],
        );
        let outputs = network.activate(&[2.0, 0.5]);

        assert_eq!(outputs.len(), OUTPUT_SIZE);
        assert!((outputs[0] - 2.0f32.tanh()).abs() < 1e-6);
        assert_eq!(action_from_outputs(&outputs), Some(Action::Left));
    }

    #[test]
    fn test_random_linear_network_is_seeded() {
        let a = LinearNetwork::random(3).activate(&[1.0, 2.0]);
        let b = LinearNetwork::random(3).activate(&[1.0, 2.0]);
        assert_eq!(a, b);
        assert!(a.iter().all(|v| v.abs() <= 1.0));
    }
}
