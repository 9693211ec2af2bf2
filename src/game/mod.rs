//! Core simulation for Snake
//!
//! This module contains all the game rules without any I/O or rendering dependencies.
//! Agents drive it one tick at a time through [`GameEngine::step`].

pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod observation;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::GameConfig;
pub use engine::{GameEngine, StepInfo, StepResult};
pub use error::GameError;
pub use observation::{Observation, OBSERVATION_SIZE};
pub use state::{GameState, Position, Snake, Termination};
