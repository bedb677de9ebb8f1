use serde::{Deserialize, Serialize};

/// One of the four discrete moves the snake can make
///
/// Index convention: Up = 0, Down = 1, Left = 2, Right = 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    /// All actions in index order
    pub const ALL: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

    /// The action pointing the other way
    pub fn opposite(self) -> Action {
        match self {
            Action::Up => Action::Down,
            Action::Down => Action::Up,
            Action::Left => Action::Right,
            Action::Right => Action::Left,
        }
    }

    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(self, other: Action) -> bool {
        self.opposite() == other
    }

    /// Returns the delta (dx, dy) for moving in this direction
    pub fn delta(self) -> (i32, i32) {
        match self {
            Action::Up => (0, -1),
            Action::Down => (0, 1),
            Action::Left => (-1, 0),
            Action::Right => (1, 0),
        }
    }

    pub fn index(self) -> usize {
        match self {
            Action::Up => 0,
            Action::Down => 1,
            Action::Left => 2,
            Action::Right => 3,
        }
    }

    /// Convert a discrete action index back to an action
    pub fn from_index(idx: usize) -> Option<Action> {
        Self::ALL.get(idx).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_directions() {
        assert!(Action::Up.is_opposite(Action::Down));
        assert!(Action::Down.is_opposite(Action::Up));
        assert!(Action::Left.is_opposite(Action::Right));
        assert!(Action::Right.is_opposite(Action::Left));

        assert!(!Action::Up.is_opposite(Action::Left));
        assert!(!Action::Up.is_opposite(Action::Right));
        assert!(!Action::Up.is_opposite(Action::Up));
    }

    #[test]
    fn test_opposite_is_involution() {
        for action in Action::ALL {
            assert_eq!(action.opposite().opposite(), action);
        }
    }

    #[test]
    fn test_direction_delta() {
        assert_eq!(Action::Up.delta(), (0, -1));
        assert_eq!(Action::Down.delta(), (0, 1));
        assert_eq!(Action::Left.delta(), (-1, 0));
        assert_eq!(Action::Right.delta(), (1, 0));
    }

    #[test]
    fn test_index_mapping() {
        for (idx, action) in Action::ALL.iter().enumerate() {
            assert_eq!(action.index(), idx);
            assert_eq!(Action::from_index(idx), Some(*action));
        }
        assert_eq!(Action::from_index(4), None);
    }
}
