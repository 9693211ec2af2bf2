use serde::{Deserialize, Serialize};

use super::error::GameError;

/// Compass heading of the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    /// Headings in clockwise order, starting from Right
    pub const CLOCKWISE: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    /// Position of this heading in [`Direction::CLOCKWISE`]
    pub fn clockwise_index(&self) -> usize {
        match self {
            Direction::Right => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Up => 3,
        }
    }

    /// Heading after applying a relative action
    pub fn turned(&self, action: Action) -> Direction {
        let idx = self.clockwise_index();
        let next = match action {
            Action::Straight => idx,
            Action::TurnRight => (idx + 1) % 4,
            Action::TurnLeft => (idx + 3) % 4,
        };
        Self::CLOCKWISE[next]
    }

    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }

    /// Unit step (dx, dy) in screen coordinates, y grows downward
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Relative action chosen by an agent each tick
///
/// On the wire this is a one-hot array `[straight, right, left]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Keep the current heading
    Straight,
    /// Rotate heading clockwise
    TurnRight,
    /// Rotate heading counter-clockwise
    TurnLeft,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Straight, Action::TurnRight, Action::TurnLeft];

    /// Decode a one-hot slice. Anything but exactly one `1` among three
    /// zeros-or-ones is rejected.
    pub fn from_one_hot(encoded: &[u8]) -> Result<Self, GameError> {
        match encoded {
            [1, 0, 0] => Ok(Action::Straight),
            [0, 1, 0] => Ok(Action::TurnRight),
            [0, 0, 1] => Ok(Action::TurnLeft),
            other => Err(GameError::InvalidAction(format!(
                "expected one-hot [straight, right, left], got {other:?}"
            ))),
        }
    }

    pub fn one_hot(&self) -> [u8; 3] {
        match self {
            Action::Straight => [1, 0, 0],
            Action::TurnRight => [0, 1, 0],
            Action::TurnLeft => [0, 0, 1],
        }
    }

    /// Map a discrete action index (0 = straight, 1 = right, 2 = left)
    pub fn from_index(idx: usize) -> Result<Self, GameError> {
        Self::ALL
            .get(idx)
            .copied()
            .ok_or_else(|| GameError::InvalidAction(format!("action index {idx} out of range 0..3")))
    }

    pub fn index(&self) -> usize {
        match self {
            Action::Straight => 0,
            Action::TurnRight => 1,
            Action::TurnLeft => 2,
        }
    }

    /// Relative action that steers `current` toward the absolute heading
    /// `desired`. A reversal cannot be expressed and maps to Straight.
    pub fn toward(current: Direction, desired: Direction) -> Self {
        if current.turned(Action::TurnRight) == desired {
            Action::TurnRight
        } else if current.turned(Action::TurnLeft) == desired {
            Action::TurnLeft
        } else {
            Action::Straight
        }
    }
}

impl TryFrom<[u8; 3]> for Action {
    type Error = GameError;

    fn try_from(encoded: [u8; 3]) -> Result<Self, Self::Error> {
        Action::from_one_hot(&encoded)
    }
}

impl TryFrom<&[u8]> for Action {
    type Error = GameError;

    fn try_from(encoded: &[u8]) -> Result<Self, Self::Error> {
        Action::from_one_hot(encoded)
    }
}
