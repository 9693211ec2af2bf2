//! Compact feature view of an episode for decision-making agents

use super::{Action, Direction, GameEngine};

/// Number of features in an [`Observation`]
pub const OBSERVATION_SIZE: usize = 11;

/// Eleven boolean features describing the snake's surroundings
///
/// Layout:
/// - 0..3: danger one cell ahead when going straight, turning right, turning left
/// - 3..7: current heading is left, right, up, down
/// - 7..11: food lies left, right, above, below the head
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub danger_straight: bool,
    pub danger_right: bool,
    pub danger_left: bool,
    pub heading: Direction,
    pub food_left: bool,
    pub food_right: bool,
    pub food_up: bool,
    pub food_down: bool,
}

impl Observation {
    /// Build the observation from the engine's current state
    pub fn from_engine(engine: &GameEngine) -> Self {
        let state = engine.state();
        let head = state.snake.head();
        let heading = state.snake.direction;
        let danger = |action: Action| {
            let ahead = head.moved_in_direction(heading.turned(action), state.block_size);
            engine.is_collision(ahead)
        };

        Self {
            danger_straight: danger(Action::Straight),
            danger_right: danger(Action::TurnRight),
            danger_left: danger(Action::TurnLeft),
            heading,
            food_left: state.food.x < head.x,
            food_right: state.food.x > head.x,
            food_up: state.food.y < head.y,
            food_down: state.food.y > head.y,
        }
    }

    /// Whether taking `action` would end the episode on a collision
    pub fn danger(&self, action: Action) -> bool {
        match action {
            Action::Straight => self.danger_straight,
            Action::TurnRight => self.danger_right,
            Action::TurnLeft => self.danger_left,
        }
    }

    /// Whether the food lies in the given compass direction from the head
    pub fn food_towards(&self, direction: Direction) -> bool {
        match direction {
            Direction::Left => self.food_left,
            Direction::Right => self.food_right,
            Direction::Up => self.food_up,
            Direction::Down => self.food_down,
        }
    }

    pub fn as_array(&self) -> [bool; OBSERVATION_SIZE] {
        [
            self.danger_straight,
            self.danger_right,
            self.danger_left,
            self.heading == Direction::Left,
            self.heading == Direction::Right,
            self.heading == Direction::Up,
            self.heading == Direction::Down,
            self.food_left,
            self.food_right,
            self.food_up,
            self.food_down,
        ]
    }

    /// Features as 0.0 / 1.0, the usual input to a policy network
    pub fn to_vec_f32(&self) -> Vec<f32> {
        self.as_array()
            .iter()
            .map(|&flag| if flag { 1.0 } else { 0.0 })
            .collect()
    }
}
