use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use super::action::Action;
use super::grid::Grid;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position one cell in the direction of an action
    pub fn moved(&self, action: Action) -> Self {
        let (dx, dy) = action.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake in the game
///
/// Segments are stored head first. The occupancy set mirrors `body` so
/// membership checks stay O(1) as the snake grows.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: VecDeque<Position>,
    occupied: HashSet<Position>,
}

impl Snake {
    /// Create a straight snake whose body trails to the left of `head`
    pub fn new(head: Position, length: usize) -> Self {
        Self::from_body((0..length.max(1) as i32).map(|i| head.moved_by(-i, 0)).collect())
    }

    /// Build a snake from explicit segments, head first; `None` if there are none
    pub fn from_segments<I: IntoIterator<Item = Position>>(segments: I) -> Option<Self> {
        let body: VecDeque<Position> = segments.into_iter().collect();
        if body.is_empty() {
            return None;
        }
        Some(Self::from_body(body))
    }

    fn from_body(body: VecDeque<Position>) -> Self {
        let occupied = body.iter().copied().collect();
        Self { body, occupied }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn tail(&self) -> Option<Position> {
        self.body.back().copied()
    }

    /// Check if any segment, the tail included, occupies `pos`
    pub fn contains(&self, pos: Position) -> bool {
        self.occupied.contains(&pos)
    }

    pub fn occupied(&self) -> &HashSet<Position> {
        &self.occupied
    }

    pub fn segments(&self) -> impl Iterator<Item = Position> + '_ {
        self.body.iter().copied()
    }

    /// Push a new head; drop the tail unless the snake grows this tick
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.push_front(new_head);
        self.occupied.insert(new_head);

        if !grow {
            if let Some(tail) = self.body.pop_back() {
                self.occupied.remove(&tail);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// Snake left the grid
    Wall,
    /// Snake ran into one of its own segments
    SelfCollision,
    /// Too long without eating
    IdleTimeout,
    /// No free cell left to place food on
    BoardFilled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Over,
}

/// Read-only view of the simulation for drawing
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSnapshot {
    pub grid: Grid,
    /// Segments, head first
    pub snake: Vec<Position>,
    pub food: Option<Position>,
    pub score: i32,
    pub over: bool,
}

impl RenderSnapshot {
    pub fn head(&self) -> Option<Position> {
        self.snake.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_by(-1, 0), Position::new(4, 5));
        assert_eq!(pos.moved(Action::Down), Position::new(5, 6));
        assert_eq!(pos.moved(Action::Up), Position::new(5, 4));
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Position::new(5, 5), 3);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(5, 5));
        let segments: Vec<_> = snake.segments().collect();
        assert_eq!(
            segments,
            vec![Position::new(5, 5), Position::new(4, 5), Position::new(3, 5)]
        );
        assert_eq!(snake.tail(), Some(Position::new(3, 5)));
    }

    #[test]
    fn test_zero_length_snake_has_head() {
        let snake = Snake::new(Position::new(2, 2), 0);
        assert_eq!(snake.len(), 1);
    }

    #[test]
    fn test_from_segments_needs_a_head() {
        assert!(Snake::from_segments(std::iter::empty()).is_none());

        let snake = Snake::from_segments([Position::new(1, 1), Position::new(1, 2)]).unwrap();
        assert_eq!(snake.head(), Position::new(1, 1));
        assert_eq!(snake.tail(), Some(Position::new(1, 2)));
        assert!(snake.contains(Position::new(1, 2)));
    }

    #[test]
    fn test_snake_advance() {
        let mut snake = Snake::new(Position::new(5, 5), 3);

        snake.advance(Position::new(6, 5), false);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(6, 5));
        assert!(!snake.contains(Position::new(3, 5)));

        snake.advance(Position::new(7, 5), true);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Position::new(7, 5));
        assert!(snake.contains(Position::new(4, 5)));
        assert_eq!(snake.occupied().len(), snake.len());
    }

    #[test]
    fn test_contains_includes_head_and_tail() {
        let snake = Snake::new(Position::new(5, 5), 3);
        assert!(snake.contains(Position::new(5, 5)));
        assert!(snake.contains(Position::new(3, 5)));
        assert!(!snake.contains(Position::new(10, 10)));
    }
}
