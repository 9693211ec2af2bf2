//! Headless batch runs of an agent
//!
//! Plays a fixed number of episodes as fast as possible and reports rolling
//! statistics. Useful for comparing agents and checking determinism.
//!
//! # Example
//!
//! ```rust
//! use snake_ai::agent::GreedyAgent;
//! use snake_ai::game::GameConfig;
//! use snake_ai::modes::{BenchConfig, BenchMode};
//!
//! let mut config = BenchConfig::new(5);
//! config.game_config = GameConfig::small().with_seed(7);
//!
//! let mut bench = BenchMode::new(config, GreedyAgent::new()).unwrap();
//! let stats = bench.run().unwrap();
//! assert_eq!(stats.total_episodes(), 5);
//! ```

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::agent::Agent;
use crate::game::{GameConfig, GameEngine, GameError, Termination};
use crate::metrics::EpisodeStats;

/// Configuration for bench mode
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Number of episodes to play
    pub num_episodes: usize,

    /// Log progress every N episodes
    pub log_frequency: usize,

    /// Rolling window for averaged statistics
    pub stats_window: usize,

    /// Game configuration (grid size, rewards, seed)
    pub game_config: GameConfig,
}

impl BenchConfig {
    pub fn new(num_episodes: usize) -> Self {
        Self {
            num_episodes,
            log_frequency: 100,
            stats_window: 100,
            game_config: GameConfig::default(),
        }
    }
}

/// Outcome of one headless episode
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeOutcome {
    pub reward: f32,
    pub steps: usize,
    pub score: u32,
    /// `None` when the board filled up and no food could be placed
    pub termination: Option<Termination>,
}

pub struct BenchMode<A: Agent> {
    engine: GameEngine,
    agent: A,
    stats: EpisodeStats,
    config: BenchConfig,
}

impl<A: Agent> BenchMode<A> {
    pub fn new(config: BenchConfig, agent: A) -> Result<Self> {
        let engine =
            GameEngine::new(config.game_config.clone()).context("Failed to start game")?;
        let stats = EpisodeStats::new(config.stats_window);

        Ok(Self {
            engine,
            agent,
            stats,
            config,
        })
    }

    /// Play all episodes and return the collected statistics
    pub fn run(&mut self) -> Result<&EpisodeStats> {
        self.print_header();

        for episode in 0..self.config.num_episodes {
            if episode > 0 {
                self.engine.reset().context("Failed to reset game")?;
            }

            let outcome = self.run_episode()?;
            self.stats.record_episode(
                outcome.reward,
                outcome.steps,
                outcome.score,
                outcome.termination,
            );

            if self.config.log_frequency > 0 && (episode + 1) % self.config.log_frequency == 0 {
                info!(
                    episode = episode + 1,
                    total = self.config.num_episodes,
                    "{}",
                    self.stats.format_summary()
                );
            }
        }

        println!("\nBench complete!");
        println!("{}", self.stats.format_summary());

        Ok(&self.stats)
    }

    /// Play the current episode until it ends
    pub fn run_episode(&mut self) -> Result<EpisodeOutcome> {
        let mut reward = 0.0;
        let mut steps = 0;

        loop {
            let action = self.agent.act(&self.engine);
            steps += 1;

            match self.engine.step(action) {
                Ok(result) => {
                    reward += result.reward;
                    if result.done {
                        return Ok(EpisodeOutcome {
                            reward,
                            steps,
                            score: result.score,
                            termination: result.info.termination,
                        });
                    }
                }
                Err(GameError::FoodUnplaceable { attempts }) => {
                    warn!(attempts, "board full, ending episode");
                    reward += self.engine.config().food_reward;
                    return Ok(EpisodeOutcome {
                        reward,
                        steps,
                        score: self.engine.state().score,
                        termination: None,
                    });
                }
                Err(err) => return Err(err).context("Game step failed"),
            }
        }
    }

    pub fn stats(&self) -> &EpisodeStats {
        &self.stats
    }

    fn print_header(&self) {
        let game = &self.config.game_config;
        println!("{}", "=".repeat(70));
        println!("Snake bench - {} agent", self.agent.name());
        println!("{}", "=".repeat(70));
        println!("Episodes: {}", self.config.num_episodes);
        println!(
            "Field: {}x{} px, block {} ({}x{} cells)",
            game.width,
            game.height,
            game.block_size,
            game.cols(),
            game.rows()
        );
        println!("Seed: {:?}", game.rng_seed);
        println!("{}", "=".repeat(70));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{GreedyAgent, RandomAgent};

    fn small_bench(episodes: usize, seed: u64) -> BenchConfig {
        let mut config = BenchConfig::new(episodes);
        config.game_config = GameConfig::small().with_seed(seed);
        config
    }

    #[test]
    fn test_bench_config_creation() {
        let config = BenchConfig::new(1000);
        assert_eq!(config.num_episodes, 1000);
        assert_eq!(config.log_frequency, 100);
    }

    #[test]
    fn test_run_single_episode() {
        let mut bench = BenchMode::new(small_bench(1, 3), RandomAgent::new(Some(3))).unwrap();

        let outcome = bench.run_episode().unwrap();

        assert!(outcome.steps > 0);
        assert!(outcome.termination.is_some());
        // The terminal tick always carries the death penalty
        assert_eq!(outcome.reward, outcome.score as f32 * 10.0 - 10.0);
    }

    #[test]
    fn test_run_records_every_episode() {
        let mut bench = BenchMode::new(small_bench(12, 5), GreedyAgent::new()).unwrap();

        let stats = bench.run().unwrap();

        assert_eq!(stats.total_episodes(), 12);
        assert!(stats.total_steps() >= 12);
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let mut a = BenchMode::new(small_bench(1, 8), RandomAgent::new(Some(8))).unwrap();
        let mut b = BenchMode::new(small_bench(1, 8), RandomAgent::new(Some(8))).unwrap();

        assert_eq!(a.run_episode().unwrap(), b.run_episode().unwrap());
    }
}
