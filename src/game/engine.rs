use std::collections::HashSet;

use rand::{rngs::SmallRng, seq::SliceRandom, Rng, SeedableRng};
use tracing::{debug, trace};

use super::{
    action::{Action, Direction},
    config::GameConfig,
    error::GameError,
    state::{GameState, Position, Snake, Termination},
};

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Why the episode ended, if it ended this step
    pub termination: Option<Termination>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Reward for this step
    pub reward: f32,
    /// Whether the episode has terminated
    pub done: bool,
    /// Score after this step
    pub score: u32,
    /// Additional information about the step
    pub info: StepInfo,
}

impl StepResult {
    /// The `(reward, done, score)` triple
    pub fn as_tuple(&self) -> (f32, bool, u32) {
        (self.reward, self.done, self.score)
    }
}

/// The game engine: owns the episode and applies all rules
pub struct GameEngine {
    config: GameConfig,
    rng: SmallRng,
    state: GameState,
}

impl GameEngine {
    /// Create a new engine and start the first episode
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let mut rng = seeded_rng(&config);
        let state = initial_state(&config, &mut rng)?;
        debug!(
            width = config.width,
            height = config.height,
            block = config.block_size,
            seed = ?config.rng_seed,
            "game engine created"
        );
        Ok(Self { config, rng, state })
    }

    /// Resume from an existing state snapshot
    pub fn with_state(config: GameConfig, state: GameState) -> Result<Self, GameError> {
        config.validate()?;
        if state.width != config.width
            || state.height != config.height
            || state.block_size != config.block_size
        {
            return Err(GameError::StateMismatch(format!(
                "state is {}x{} (block {}), config is {}x{} (block {})",
                state.width,
                state.height,
                state.block_size,
                config.width,
                config.height,
                config.block_size
            )));
        }
        if state.snake.is_empty() {
            return Err(GameError::StateMismatch("snake has no segments".into()));
        }
        let rng = seeded_rng(&config);
        Ok(Self { config, rng, state })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Read-only view of the current episode
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Reset the game to a fresh episode
    pub fn reset(&mut self) -> Result<&GameState, GameError> {
        self.state = initial_state(&self.config, &mut self.rng)?;
        debug!(food = ?self.state.food, "episode reset");
        Ok(&self.state)
    }

    /// Execute one tick of the game
    pub fn step(&mut self, action: Action) -> Result<StepResult, GameError> {
        if !self.state.is_alive {
            return Ok(StepResult {
                reward: 0.0,
                done: true,
                score: self.state.score,
                info: StepInfo {
                    ate_food: false,
                    termination: None,
                },
            });
        }

        self.state.frame_iteration += 1;

        let direction = self.state.snake.direction.turned(action);
        self.state.snake.direction = direction;

        let new_head = self
            .state
            .snake
            .head()
            .moved_in_direction(direction, self.config.block_size);
        self.state.snake.push_head(new_head);

        if let Some(termination) = self.check_termination() {
            self.state.is_alive = false;
            debug!(
                ?termination,
                score = self.state.score,
                frames = self.state.frame_iteration,
                length = self.state.snake.len(),
                "episode terminated"
            );
            return Ok(StepResult {
                reward: self.config.death_penalty,
                done: true,
                score: self.state.score,
                info: StepInfo {
                    ate_food: false,
                    termination: Some(termination),
                },
            });
        }

        let ate_food = new_head == self.state.food;
        let reward = if ate_food {
            self.state.score += 1;
            match self.place_food() {
                Ok(food) => self.state.food = food,
                Err(err) => {
                    self.state.is_alive = false;
                    return Err(err);
                }
            }
            self.config.food_reward
        } else {
            self.state.snake.trim_tail();
            self.config.step_reward
        };

        trace!(
            ?action,
            ?direction,
            head = ?new_head,
            reward,
            frame = self.state.frame_iteration,
            "step"
        );

        Ok(StepResult {
            reward,
            done: false,
            score: self.state.score,
            info: StepInfo {
                ate_food,
                termination: None,
            },
        })
    }

    /// Whether `pos` would hit a wall or the body (head excluded)
    pub fn is_collision(&self, pos: Position) -> bool {
        self.collision_at(pos).is_some()
    }

    /// Kind of collision at `pos`, if any
    pub fn collision_at(&self, pos: Position) -> Option<Termination> {
        if !self.state.is_in_bounds(pos) {
            return Some(Termination::Wall);
        }
        if self.state.snake.collides_with_body(pos) {
            return Some(Termination::SelfCollision);
        }
        None
    }

    /// Evaluated after the new head is in place
    fn check_termination(&self) -> Option<Termination> {
        if let Some(collision) = self.collision_at(self.state.snake.head()) {
            return Some(collision);
        }

        let budget = u64::from(self.config.stall_factor) * self.state.snake.len() as u64;
        if u64::from(self.state.frame_iteration) > budget {
            return Some(Termination::Timeout);
        }

        None
    }

    fn place_food(&mut self) -> Result<Position, GameError> {
        let food = spawn_food_avoid_snake(&self.config, &mut self.rng, &self.state.snake)?;
        debug!(?food, length = self.state.snake.len(), "food placed");
        Ok(food)
    }
}

fn seeded_rng(config: &GameConfig) -> SmallRng {
    match config.rng_seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    }
}

fn initial_state(config: &GameConfig, rng: &mut SmallRng) -> Result<GameState, GameError> {
    let block = config.block_size;
    let head = Position::new((config.cols() / 2) * block, (config.rows() / 2) * block);
    let snake = Snake::new(head, Direction::Right, config.initial_snake_length, block);
    let food = spawn_food_avoid_snake(config, rng, &snake)?;

    Ok(GameState::new(
        snake,
        food,
        config.width,
        config.height,
        block,
    ))
}

/// Spawn food at a random cell the snake does not occupy
///
/// Tries `food_placement_attempts` random draws first. On a crowded board the
/// draws can all land on the body, so the fallback picks uniformly among the
/// free cells. Fails only when no free cell is left.
fn spawn_food_avoid_snake(
    config: &GameConfig,
    rng: &mut SmallRng,
    snake: &Snake,
) -> Result<Position, GameError> {
    if snake.len() as u64 >= config.cell_count() {
        return Err(GameError::FoodUnplaceable { attempts: 0 });
    }

    for _ in 0..config.food_placement_attempts {
        let x = rng.gen_range(0..config.cols()) * config.block_size;
        let y = rng.gen_range(0..config.rows()) * config.block_size;
        let pos = Position::new(x, y);

        if !snake.occupies(pos) {
            return Ok(pos);
        }
    }

    let occupied: HashSet<Position> = snake.body.iter().copied().collect();
    let block = config.block_size;
    let free: Vec<Position> = (0..config.rows())
        .flat_map(|row| {
            (0..config.cols()).map(move |col| Position::new(col * block, row * block))
        })
        .filter(|pos| !occupied.contains(pos))
        .collect();
    trace!(
        free = free.len(),
        draws = config.food_placement_attempts,
        "random draws exhausted, choosing among free cells"
    );

    free.choose(rng)
        .copied()
        .ok_or(GameError::FoodUnplaceable {
            attempts: config.food_placement_attempts,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(config: GameConfig) -> GameEngine {
        GameEngine::new(config.with_seed(42)).unwrap()
    }

    /// Engine with a hand-built snake and food
    fn engine_with(config: GameConfig, snake: Snake, food: Position) -> GameEngine {
        let state = GameState::new(snake, food, config.width, config.height, config.block_size);
        GameEngine::with_state(config.with_seed(1), state).unwrap()
    }

    #[test]
    fn test_reset() {
        let mut engine = seeded(GameConfig::default());
        let state = engine.reset().unwrap();

        assert!(state.is_alive);
        assert_eq!(state.score, 0);
        assert_eq!(state.frame_iteration, 0);
        assert_eq!(state.snake.direction, Direction::Right);
        assert_eq!(
            state.snake.body,
            vec![
                Position::new(320, 240),
                Position::new(300, 240),
                Position::new(280, 240),
            ]
        );
        assert!(!state.snake.occupies(state.food));
    }

    #[test]
    fn test_reset_replaces_state() {
        let mut engine = seeded(GameConfig::small());
        engine.state.score = 7;
        engine.state.frame_iteration = 50;
        engine.state.is_alive = false;

        engine.reset().unwrap();

        assert_eq!(engine.state().score, 0);
        assert_eq!(engine.state().frame_iteration, 0);
        assert!(engine.state().is_alive);
    }

    #[test]
    fn test_centre_is_aligned_on_odd_grid() {
        // 11 x 9 cells
        let engine = seeded(GameConfig::new(220, 180));
        let head = engine.state().snake.head();
        assert_eq!(head, Position::new(100, 80));
        assert_eq!(head.x % 20, 0);
        assert_eq!(head.y % 20, 0);
    }

    #[test]
    fn test_basic_movement() {
        let config = GameConfig::default();
        let snake = Snake::new(Position::new(320, 240), Direction::Right, 3, 20);
        let mut engine = engine_with(config, snake, Position::new(0, 0));

        let result = engine.step(Action::Straight).unwrap();

        assert_eq!(result.as_tuple(), (0.0, false, 0));
        assert!(!result.info.ate_food);
        assert_eq!(engine.state().frame_iteration, 1);
        assert_eq!(
            engine.state().snake.body,
            vec![
                Position::new(340, 240),
                Position::new(320, 240),
                Position::new(300, 240),
            ]
        );
    }

    #[test]
    fn test_turns_update_direction() {
        let config = GameConfig::default();
        let snake = Snake::new(Position::new(320, 240), Direction::Right, 3, 20);
        let mut engine = engine_with(config, snake, Position::new(0, 0));

        engine.step(Action::TurnRight).unwrap();
        assert_eq!(engine.state().snake.direction, Direction::Down);
        assert_eq!(engine.state().snake.head(), Position::new(320, 260));

        engine.step(Action::TurnLeft).unwrap();
        assert_eq!(engine.state().snake.direction, Direction::Right);
        assert_eq!(engine.state().snake.head(), Position::new(340, 260));

        engine.step(Action::TurnLeft).unwrap();
        assert_eq!(engine.state().snake.direction, Direction::Up);
        assert_eq!(engine.state().snake.head(), Position::new(340, 240));
    }

    #[test]
    fn test_food_consumption() {
        let config = GameConfig::small();
        let snake = Snake::new(Position::new(100, 100), Direction::Right, 3, 20);
        let mut engine = engine_with(config, snake, Position::new(120, 100));

        let result = engine.step(Action::Straight).unwrap();

        assert!(result.info.ate_food);
        assert_eq!(result.as_tuple(), (10.0, false, 1));
        assert_eq!(engine.state().snake.len(), 4);
        assert_eq!(engine.state().snake.tail(), Position::new(60, 100));
        assert!(!engine.state().snake.occupies(engine.state().food));
    }

    #[test]
    fn test_wall_collision() {
        let config = GameConfig::default();
        let snake = Snake::new(Position::new(620, 240), Direction::Right, 3, 20);
        let mut engine = engine_with(config, snake, Position::new(0, 0));

        let result = engine.step(Action::Straight).unwrap();

        assert_eq!(result.as_tuple(), (-10.0, true, 0));
        assert_eq!(result.info.termination, Some(Termination::Wall));
        assert!(!engine.state().is_alive);
        // Left at grown length with the out-of-bounds head in place
        assert_eq!(engine.state().snake.len(), 4);
        assert_eq!(engine.state().snake.head(), Position::new(640, 240));
    }

    #[test]
    fn test_wall_collision_at_origin() {
        let config = GameConfig::small();
        let snake = Snake::new(Position::new(0, 100), Direction::Up, 3, 20);
        let mut engine = engine_with(config, snake, Position::new(180, 180));

        let result = engine.step(Action::TurnLeft).unwrap();

        assert!(result.done);
        assert_eq!(result.info.termination, Some(Termination::Wall));
    }

    #[test]
    fn test_self_collision() {
        let config = GameConfig::small();
        // Head (100,100) heading Right, body trailing left to (20,100)
        let snake = Snake::new(Position::new(100, 100), Direction::Right, 5, 20);
        let mut engine = engine_with(config, snake, Position::new(180, 180));

        // Down, Left, then Up into (80, 100)
        assert!(!engine.step(Action::TurnRight).unwrap().done);
        assert!(!engine.step(Action::TurnRight).unwrap().done);
        let result = engine.step(Action::TurnRight).unwrap();

        assert!(result.done);
        assert_eq!(result.reward, -10.0);
        assert_eq!(result.info.termination, Some(Termination::SelfCollision));
    }

    #[test]
    fn test_moving_into_old_tail_cell_collides() {
        let config = GameConfig::small();
        // A 4-cell square loop: head (120,100), body (100,100),(100,120),(120,120)
        let snake = Snake {
            body: vec![
                Position::new(120, 100),
                Position::new(100, 100),
                Position::new(100, 120),
                Position::new(120, 120),
            ],
            direction: Direction::Right,
        };
        let mut engine = engine_with(config, snake, Position::new(180, 180));

        // Turning right moves the head onto the tail, which has not moved yet
        let result = engine.step(Action::TurnRight).unwrap();
        assert_eq!(result.info.termination, Some(Termination::SelfCollision));
    }

    #[test]
    fn test_timeout() {
        let mut config = GameConfig::small();
        config.stall_factor = 1;
        let snake = Snake::new(Position::new(100, 100), Direction::Right, 3, 20);
        let mut engine = engine_with(config, snake, Position::new(0, 180));

        // Circle in a 2x2 loop so walls and body are never hit. The budget
        // uses the grown length, 1 * 4, so frame 5 is the first over it.
        for _ in 0..4 {
            assert!(!engine.step(Action::TurnRight).unwrap().done);
        }
        let result = engine.step(Action::TurnRight).unwrap();

        assert!(result.done);
        assert_eq!(result.reward, -10.0);
        assert_eq!(result.info.termination, Some(Termination::Timeout));
        assert_eq!(engine.state().frame_iteration, 5);
    }

    #[test]
    fn test_timeout_budget_is_not_reset_by_food() {
        let mut config = GameConfig::default();
        config.stall_factor = 1;
        let snake = Snake::new(Position::new(100, 100), Direction::Right, 3, 20);
        let mut engine = engine_with(config, snake, Position::new(120, 100));

        assert!(engine.step(Action::Straight).unwrap().info.ate_food);
        engine.state.food = Position::new(0, 460);

        // Grown length 5 gives a budget of 5 frames counted from reset
        for _ in 2..=5 {
            assert!(!engine.step(Action::Straight).unwrap().done);
        }
        let result = engine.step(Action::Straight).unwrap();

        assert_eq!(result.info.termination, Some(Termination::Timeout));
        assert_eq!(engine.state().frame_iteration, 6);
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = seeded(GameConfig::small());
        engine.state.is_alive = false;
        let before = engine.state().clone();

        let result = engine.step(Action::Straight).unwrap();

        assert!(result.done);
        assert_eq!(result.reward, 0.0);
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_is_collision_queries() {
        let engine = seeded(GameConfig::default());
        assert!(engine.is_collision(Position::new(-20, 0)));
        assert!(engine.is_collision(Position::new(640, 0)));
        assert!(engine.is_collision(Position::new(300, 240)));
        assert!(!engine.is_collision(Position::new(320, 240))); // head
        assert!(!engine.is_collision(Position::new(340, 240)));
        assert_eq!(
            engine.collision_at(Position::new(0, 480)),
            Some(Termination::Wall)
        );
    }

    #[test]
    fn test_food_unplaceable_on_full_board() {
        // 4 x 1 cells, all covered
        let config = GameConfig {
            width: 80,
            height: 20,
            ..Default::default()
        };
        let snake = Snake::new(Position::new(60, 0), Direction::Right, 4, 20);
        let mut rng = SmallRng::seed_from_u64(3);

        let result = spawn_food_avoid_snake(&config, &mut rng, &snake);
        assert_eq!(result, Err(GameError::FoodUnplaceable { attempts: 0 }));
    }

    #[test]
    fn test_food_fills_last_free_cell() {
        // 4 x 1 cells, one free
        let config = GameConfig {
            width: 80,
            height: 20,
            ..Default::default()
        };
        let snake = Snake::new(Position::new(40, 0), Direction::Right, 3, 20);
        let mut rng = SmallRng::seed_from_u64(3);

        let food = spawn_food_avoid_snake(&config, &mut rng, &snake).unwrap();
        assert_eq!(food, Position::new(60, 0));
    }

    /// Snake winding row by row over a `cols x rows` grid, leaving the
    /// last `free` cells of the walk uncovered
    fn serpentine(cols: i32, rows: i32, free: usize, block: i32) -> Snake {
        let mut walk: Vec<Position> = (0..rows)
            .flat_map(|row| {
                let xs: Vec<i32> = if row % 2 == 0 {
                    (0..cols).collect()
                } else {
                    (0..cols).rev().collect()
                };
                xs.into_iter()
                    .map(move |col| Position::new(col * block, row * block))
            })
            .collect();
        walk.truncate(walk.len() - free);
        walk.reverse();
        Snake {
            body: walk,
            direction: Direction::Right,
        }
    }

    #[test]
    fn test_food_found_on_crowded_large_grid() {
        // 100 x 100 cells with a single free cell in the bottom-left corner
        let config = GameConfig::new(2000, 2000);
        let snake = serpentine(100, 100, 1, 20);
        assert_eq!(snake.len(), 9_999);

        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let food = spawn_food_avoid_snake(&config, &mut rng, &snake);
            assert_eq!(food, Ok(Position::new(0, 1980)), "seed {seed}");
        }
    }

    #[test]
    fn test_food_fallback_picks_a_free_cell() {
        let config = GameConfig {
            width: 200,
            height: 200,
            food_placement_attempts: 1,
            ..Default::default()
        };
        let snake = serpentine(10, 10, 5, 20);

        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let food = spawn_food_avoid_snake(&config, &mut rng, &snake).unwrap();
            assert!(!snake.occupies(food));
            assert_eq!(food.y, 180);
        }
    }

    #[test]
    fn test_huge_grid_places_food() {
        // 50 000 x 50 000 cells, more than i32::MAX in total
        let engine = GameEngine::new(GameConfig::new(1_000_000, 1_000_000).with_seed(1)).unwrap();
        let food = engine.state().food;
        assert!(engine.state().is_in_bounds(food));
        assert!(!engine.state().snake.occupies(food));
    }

    #[test]
    fn test_eating_last_free_cell_reports_unplaceable() {
        // 4 x 1 cells, snake covers 3, food on the last one
        let config = GameConfig {
            width: 80,
            height: 20,
            ..Default::default()
        };
        let snake = Snake::new(Position::new(40, 0), Direction::Right, 3, 20);
        let mut engine = engine_with(config, snake, Position::new(60, 0));

        let result = engine.step(Action::Straight);

        assert!(matches!(result, Err(GameError::FoodUnplaceable { .. })));
        assert_eq!(engine.state().score, 1);
        assert_eq!(engine.state().snake.len(), 4);
        assert!(!engine.state().is_alive);
    }

    #[test]
    fn test_with_state_rejects_mismatch() {
        let snake = Snake::new(Position::new(100, 100), Direction::Right, 3, 20);
        let state = GameState::new(snake, Position::new(0, 0), 200, 200, 20);
        let result = GameEngine::with_state(GameConfig::default(), state);
        assert!(matches!(result, Err(GameError::StateMismatch(_))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = GameEngine::new(GameConfig::new(645, 480));
        assert!(matches!(result, Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_same_seed_same_food() {
        let a = GameEngine::new(GameConfig::default().with_seed(9)).unwrap();
        let b = GameEngine::new(GameConfig::default().with_seed(9)).unwrap();
        assert_eq!(a.state().food, b.state().food);
    }
}
