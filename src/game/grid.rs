use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Position;

/// Rejection-sampling attempts before falling back to enumerating free cells
const MAX_SAMPLE_ATTEMPTS: usize = 64;

/// Dimensions of the playing field, in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Derive a grid from a pixel surface and the pixel size of one cell
    pub fn from_pixels(width_px: usize, height_px: usize, cell_size: usize) -> Self {
        Self::new(width_px / cell_size.max(1), height_px / cell_size.max(1))
    }

    /// Check if a position is within the grid bounds
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width as i32 && pos.y >= 0 && pos.y < self.height as i32
    }

    pub fn center(&self) -> Position {
        Position::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Pick a uniformly random cell that is not in `excluded`
    ///
    /// Samples blindly while the board is mostly free, then falls back to
    /// choosing among the enumerated free cells, so the call terminates as long
    /// as one free cell exists. Returns `None` when every cell is excluded.
    pub fn random_free_cell<R: Rng + ?Sized>(
        &self,
        excluded: &HashSet<Position>,
        rng: &mut R,
    ) -> Option<Position> {
        let total = self.cell_count();
        if total == 0 {
            return None;
        }

        let blocked = excluded.iter().filter(|pos| self.contains(**pos)).count();
        if blocked >= total {
            return None;
        }

        if blocked < total / 2 {
            for _ in 0..MAX_SAMPLE_ATTEMPTS {
                let pos = Position::new(
                    rng.gen_range(0..self.width) as i32,
                    rng.gen_range(0..self.height) as i32,
                );
                if !excluded.contains(&pos) {
                    return Some(pos);
                }
            }
        }

        let free: Vec<Position> = self
            .cells()
            .filter(|pos| !excluded.contains(pos))
            .collect();
        if free.is_empty() {
            return None;
        }
        Some(free[rng.gen_range(0..free.len())])
    }

    /// Iterate over every cell, row by row
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).map(move |x| Position::new(x as i32, y as i32))
        })
    }
}
