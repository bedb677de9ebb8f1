use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::grid::Grid;
use super::timeout::IdleTimeout;

/// Legacy window size in pixels
pub const DEFAULT_SURFACE_PX: usize = 600;

/// Legacy edge length of one cell in pixels
pub const DEFAULT_CELL_PX: usize = 20;

/// Reasons a [`GameConfig`] cannot drive a simulation
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("cell size must be at least one pixel")]
    ZeroCellSize,
    #[error("grid must be at least 1x1 cells, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
    #[error("starting snake of length {length} does not fit a grid {width} cells wide")]
    SnakeTooLong { length: usize, width: usize },
    #[error("idle timeout must allow at least one tick")]
    ZeroIdleTicks,
    #[error("wall-clock idle timeout must be positive, got {0}s")]
    NonPositiveTimeout(f64),
    #[error("wall-clock idle timeout of {0}s is too large")]
    TimeoutOutOfRange(f64),
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// When an episode that goes without food is cut short
    pub idle_timeout: IdleTimeout,
    /// Seed for food placement; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let grid = Grid::from_pixels(DEFAULT_SURFACE_PX, DEFAULT_SURFACE_PX, DEFAULT_CELL_PX);
        Self {
            grid_width: grid.width,
            grid_height: grid.height,
            initial_snake_length: 1,
            idle_timeout: IdleTimeout::default(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Size the grid from a pixel surface, the way the windowed game was laid out
    pub fn from_pixels(
        width_px: usize,
        height_px: usize,
        cell_px: usize,
    ) -> Result<Self, ConfigError> {
        if cell_px == 0 {
            return Err(ConfigError::ZeroCellSize);
        }
        let grid = Grid::from_pixels(width_px, height_px, cell_px);
        Ok(Self::new(grid.width, grid.height))
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_idle_timeout(mut self, idle_timeout: IdleTimeout) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_width, self.grid_height)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.grid_width,
                height: self.grid_height,
            });
        }

        // The starting body trails left of the center cell
        let room = self.grid_width / 2 + 1;
        if self.initial_snake_length > room {
            return Err(ConfigError::SnakeTooLong {
                length: self.initial_snake_length,
                width: self.grid_width,
            });
        }

        match self.idle_timeout {
            IdleTimeout::Ticks { limit: 0 } => Err(ConfigError::ZeroIdleTicks),
            IdleTimeout::WallClock { seconds } if !(seconds > 0.0) => {
                Err(ConfigError::NonPositiveTimeout(seconds))
            }
            IdleTimeout::WallClock { seconds } if Duration::try_from_secs_f64(seconds).is_err() => {
                Err(ConfigError::TimeoutOutOfRange(seconds))
            }
            _ => Ok(()),
        }
    }

    /// Load a configuration from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        config
            .validate()
            .with_context(|| format!("Invalid config in {:?}", path))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 30);
        assert_eq!(config.grid_height, 30);
        assert_eq!(config.initial_snake_length, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 12);
        assert_eq!(config.grid(), Grid::new(15, 12));
    }

    #[test]
    fn test_from_pixels() {
        assert_eq!(GameConfig::from_pixels(800, 400, 40).unwrap().grid(), Grid::new(20, 10));
        assert_eq!(GameConfig::from_pixels(800, 400, 0), Err(ConfigError::ZeroCellSize));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert_eq!(
            GameConfig::new(0, 5).validate(),
            Err(ConfigError::EmptyGrid {
                width: 0,
                height: 5
            })
        );

        let mut long = GameConfig::small();
        long.initial_snake_length = 7;
        assert!(matches!(
            long.validate(),
            Err(ConfigError::SnakeTooLong { .. })
        ));

        let ticks = GameConfig::small().with_idle_timeout(IdleTimeout::Ticks { limit: 0 });
        assert_eq!(ticks.validate(), Err(ConfigError::ZeroIdleTicks));

        let clock = GameConfig::small().with_idle_timeout(IdleTimeout::WallClock { seconds: 0.0 });
        assert!(matches!(
            clock.validate(),
            Err(ConfigError::NonPositiveTimeout(_))
        ));
    }

    #[test]
    fn test_validate_rejects_unrepresentable_timeouts() {
        for seconds in [f64::INFINITY, 1e20] {
            let config = GameConfig::small().with_idle_timeout(IdleTimeout::WallClock { seconds });
            assert_eq!(config.validate(), Err(ConfigError::TimeoutOutOfRange(seconds)));
        }

        let nan =
            GameConfig::small().with_idle_timeout(IdleTimeout::WallClock { seconds: f64::NAN });
        assert!(matches!(
            nan.validate(),
            Err(ConfigError::NonPositiveTimeout(_))
        ));

        let huge: GameConfig =
            serde_json::from_str(r#"{"idle_timeout": {"kind": "wall_clock", "seconds": 1e20}}"#)
                .unwrap();
        assert_eq!(huge.validate(), Err(ConfigError::TimeoutOutOfRange(1e20)));
    }

    #[test]
    fn test_parse_partial_json() {
        let json = r#"{
            "grid_width": 12,
            "idle_timeout": { "kind": "wall_clock", "seconds": 3.0 },
            "seed": 9
        }"#;
        let config: GameConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.grid_width, 12);
        assert_eq!(config.grid_height, 30);
        assert_eq!(config.idle_timeout, IdleTimeout::WallClock { seconds: 3.0 });
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!(
            "neuro_snake_config_{}.json",
            std::process::id()
        ));
        let config = GameConfig::small().with_seed(3);
        fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();

        let loaded = GameConfig::load(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let path = Path::new("/definitely/not/here/neuro_snake.json");
        assert!(GameConfig::load(path).is_err());
    }
}
