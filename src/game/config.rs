use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::error::GameError;

/// Configuration for the game
///
/// All lengths are in pixels; the grid is `width / block_size` cells wide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the playing field
    pub width: i32,
    /// Height of the playing field
    pub height: i32,
    /// Side of one grid cell
    pub block_size: i32,
    /// Ticks per second for paced front ends
    pub speed: u32,
    /// Initial length of the snake
    pub initial_snake_length: usize,

    // Rewards
    /// Reward for eating food
    pub food_reward: f32,
    /// Reward for a tick that neither eats nor ends the episode
    pub step_reward: f32,
    /// Penalty for dying
    pub death_penalty: f32,

    /// The episode ends once the frame counter exceeds `stall_factor * snake length`
    pub stall_factor: u32,
    /// Random draws before food placement scans for the free cells
    pub food_placement_attempts: u32,
    /// Seed for food placement; drawn from entropy when absent
    pub rng_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            block_size: 20,
            speed: 200,
            initial_snake_length: 3,
            food_reward: 10.0,
            step_reward: 0.0,
            death_penalty: -10.0,
            stall_factor: 100,
            food_placement_attempts: 10_000,
            rng_seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom field size
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Create a small 10x10-cell field for testing
    pub fn small() -> Self {
        Self::new(200, 200)
    }

    /// Create a large 48x36-cell field
    pub fn large() -> Self {
        Self::new(960, 720)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config in {:?}", path))?;
        Ok(config)
    }

    /// Number of grid columns
    pub fn cols(&self) -> i32 {
        self.width / self.block_size
    }

    /// Number of grid rows
    pub fn rows(&self) -> i32 {
        self.height / self.block_size
    }

    /// Number of cells on the field, widened so large grids cannot overflow
    pub fn cell_count(&self) -> u64 {
        u64::try_from(self.cols()).unwrap_or(0) * u64::try_from(self.rows()).unwrap_or(0)
    }

    /// Wall-clock time between ticks when paced at `speed`
    pub fn tick_interval(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.speed.max(1)))
    }

    /// Check that the grid is well formed and the starting snake fits
    pub fn validate(&self) -> Result<(), GameError> {
        if self.block_size <= 0 {
            return Err(GameError::InvalidConfig(format!(
                "block_size must be positive, got {}",
                self.block_size
            )));
        }
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if value <= 0 || value % self.block_size != 0 {
                return Err(GameError::InvalidConfig(format!(
                    "{name} must be a positive multiple of block_size {}, got {value}",
                    self.block_size
                )));
            }
        }
        if self.initial_snake_length < 3 {
            return Err(GameError::InvalidConfig(format!(
                "initial_snake_length must be at least 3, got {}",
                self.initial_snake_length
            )));
        }
        // The body extends left from the centre column
        let head_col = (self.cols() / 2) as usize;
        if self.initial_snake_length > head_col + 1 {
            return Err(GameError::InvalidConfig(format!(
                "a snake of length {} does not fit in {} columns",
                self.initial_snake_length,
                self.cols()
            )));
        }
        if self.speed == 0 {
            return Err(GameError::InvalidConfig("speed must be positive".into()));
        }
        if self.food_placement_attempts == 0 {
            return Err(GameError::InvalidConfig(
                "food_placement_attempts must be positive".into(),
            ));
        }
        Ok(())
    }
}
