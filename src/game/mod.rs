//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! It is driven the same way by a keyboard, a watched controller or a headless
//! evaluation worker.

pub mod action;
pub mod config;
pub mod engine;
pub mod grid;
pub mod state;
pub mod timeout;

// Re-export commonly used types
pub use action::Action;
pub use config::{ConfigError, GameConfig};
pub use engine::{
    Observation, SimulationError, SnakeSimulation, StepInfo, StepResult, DEATH_PENALTY,
    FOOD_REWARD, OBSERVATION_SIZE, STEP_REWARD,
};
pub use grid::Grid;
pub use state::{Position, RenderSnapshot, Snake, Status, Termination};
pub use timeout::{Clock, IdleTimeout, ManualClock, SystemClock};
