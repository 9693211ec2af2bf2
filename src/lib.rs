//! Snake AI - a step-driven Snake simulation for external agents
//!
//! This library provides:
//! - Core simulation (game module): grid, movement, collisions, food, rewards
//! - Reference agents (agent module)
//! - TUI rendering and keyboard input (render, input modules)
//! - Execution modes (human, watch, bench)
//! - Session and episode metrics

pub mod agent;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
