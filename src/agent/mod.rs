//! Automated control of the simulation
//!
//! Provides:
//! - The `Controller` interface every decision-maker implements
//! - The episode driver with anti-reversal smoothing
//! - Network-output → action adaptation for externally trained networks
//! - Parallel population evaluation for fitness reporting

pub mod controller;
pub mod driver;
pub mod evaluation;
pub mod network;

pub use controller::{Controller, RandomController};
pub use driver::{AntiReversal, EpisodeDriver, EpisodeReport};
pub use evaluation::{evaluate_controller, evaluate_population, EvaluationError};
pub use network::{action_from_outputs, LinearNetwork, Network, NetworkController, OUTPUT_LAYOUT};
