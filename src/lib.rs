//! Neuro Snake - a Snake grid simulation built to be driven by learned controllers
//!
//! This library provides:
//! - Core simulation (game module): grid, snake, food, idle timeout, rewards
//! - Control adapters (agent module): controllers, episode driver, network output mapping
//! - TUI rendering and keyboard input (render, input modules)
//! - Execution modes (human, watch, evaluate)

pub mod agent;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
