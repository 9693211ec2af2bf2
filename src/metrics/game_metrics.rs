use std::time::{Duration, Instant};

use crate::game::Termination;

/// How an interactive game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Terminated(Termination),
    /// The snake covered the board and no food could be placed
    BoardFull,
}

impl GameOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            GameOutcome::Terminated(Termination::Wall) => "wall",
            GameOutcome::Terminated(Termination::SelfCollision) => "bit itself",
            GameOutcome::Terminated(Termination::Timeout) => "stalled",
            GameOutcome::BoardFull => "board full",
        }
    }
}

/// Session tallies for the terminal modes, shown in the HUD
#[derive(Debug)]
pub struct GameMetrics {
    episode_started: Instant,
    /// Wall-clock time of the current episode
    pub episode_time: Duration,
    pub high_score: u32,
    pub games_played: u32,
    total_score: u64,
    pub last_outcome: Option<GameOutcome>,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            episode_started: Instant::now(),
            episode_time: Duration::ZERO,
            high_score: 0,
            games_played: 0,
            total_score: 0,
            last_outcome: None,
        }
    }

    /// Advance the episode clock; call while the episode is live
    pub fn refresh_clock(&mut self) {
        self.episode_time = self.episode_started.elapsed();
    }

    pub fn start_episode(&mut self) {
        self.episode_started = Instant::now();
        self.episode_time = Duration::ZERO;
    }

    pub fn record_game_over(&mut self, score: u32, outcome: GameOutcome) {
        self.games_played += 1;
        self.total_score += u64::from(score);
        self.high_score = self.high_score.max(score);
        self.last_outcome = Some(outcome);
    }

    /// Mean final score over finished games
    pub fn mean_score(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            self.total_score as f64 / f64::from(self.games_played)
        }
    }

    /// Episode clock as `mm:ss`
    pub fn clock_label(&self) -> String {
        let secs = self.episode_time.as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    pub fn last_outcome_label(&self) -> &'static str {
        self.last_outcome.map_or("-", |outcome| outcome.label())
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
