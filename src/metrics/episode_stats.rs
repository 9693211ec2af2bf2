//! Episode statistics for batches of agent runs
//!
//! Tracks episode rewards, lengths and scores over a rolling window, plus
//! lifetime totals and how episodes ended.

use std::collections::VecDeque;

use crate::game::Termination;

/// Episode statistics tracker with rolling averages
///
/// # Example
///
/// ```rust
/// use snake_ai::game::Termination;
/// use snake_ai::metrics::EpisodeStats;
///
/// let mut stats = EpisodeStats::new(100);
/// stats.record_episode(-10.0, 150, 5, Some(Termination::Wall));
///
/// assert_eq!(stats.total_episodes(), 1);
/// assert_eq!(stats.best_score(), 5);
/// println!("{}", stats.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct EpisodeStats {
    /// Episode rewards (rolling window)
    episode_rewards: VecDeque<f32>,

    /// Episode lengths in ticks (rolling window)
    episode_lengths: VecDeque<usize>,

    /// Episode scores (food eaten) (rolling window)
    episode_scores: VecDeque<u32>,

    /// Best score seen in any episode
    best_score: u32,

    /// Episodes ended by wall, self-collision, timeout
    terminations: [usize; 3],

    /// Total number of episodes completed
    total_episodes: usize,

    /// Total number of ticks taken
    total_steps: usize,

    /// Window size for rolling averages
    window_size: usize,
}

impl EpisodeStats {
    /// Create a new tracker keeping the last `window_size` episodes
    pub fn new(window_size: usize) -> Self {
        Self {
            episode_rewards: VecDeque::with_capacity(window_size),
            episode_lengths: VecDeque::with_capacity(window_size),
            episode_scores: VecDeque::with_capacity(window_size),
            best_score: 0,
            terminations: [0; 3],
            total_episodes: 0,
            total_steps: 0,
            window_size,
        }
    }

    /// Record the completion of an episode
    pub fn record_episode(
        &mut self,
        reward: f32,
        length: usize,
        score: u32,
        termination: Option<Termination>,
    ) {
        Self::push_deque(&mut self.episode_rewards, reward, self.window_size);
        Self::push_deque(&mut self.episode_lengths, length, self.window_size);
        Self::push_deque(&mut self.episode_scores, score, self.window_size);
        self.best_score = self.best_score.max(score);
        if let Some(termination) = termination {
            self.terminations[termination_slot(termination)] += 1;
        }
        self.total_episodes += 1;
        self.total_steps += length;
    }

    /// Mean episode reward over the rolling window
    pub fn mean_episode_reward(&self) -> f32 {
        Self::mean(self.episode_rewards.iter().copied())
    }

    /// Mean episode length over the rolling window
    pub fn mean_episode_length(&self) -> f32 {
        Self::mean(self.episode_lengths.iter().map(|&len| len as f32))
    }

    /// Mean episode score over the rolling window
    pub fn mean_episode_score(&self) -> f32 {
        Self::mean(self.episode_scores.iter().map(|&score| score as f32))
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    /// Lifetime count of episodes that ended with `termination`
    pub fn termination_count(&self, termination: Termination) -> usize {
        self.terminations[termination_slot(termination)]
    }

    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// One-line summary for progress logs
    pub fn format_summary(&self) -> String {
        format!(
            "Episodes: {} | Steps: {} | Reward: {:.2} | Score: {:.2} | Best: {} | Len: {:.1} | Wall/Self/Timeout: {}/{}/{}",
            self.total_episodes,
            self.total_steps,
            self.mean_episode_reward(),
            self.mean_episode_score(),
            self.best_score,
            self.mean_episode_length(),
            self.terminations[0],
            self.terminations[1],
            self.terminations[2],
        )
    }

    fn mean(values: impl ExactSizeIterator<Item = f32>) -> f32 {
        let count = values.len();
        if count == 0 {
            0.0
        } else {
            values.sum::<f32>() / count as f32
        }
    }

    /// Helper function to push to a deque with size limit
    fn push_deque<T>(deque: &mut VecDeque<T>, value: T, window_size: usize) {
        if deque.len() >= window_size {
            deque.pop_front();
        }
        deque.push_back(value);
    }
}

fn termination_slot(termination: Termination) -> usize {
    match termination {
        Termination::Wall => 0,
        Termination::SelfCollision => 1,
        Termination::Timeout => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let stats = EpisodeStats::new(100);
        assert_eq!(stats.total_episodes(), 0);
        assert_eq!(stats.total_steps(), 0);
        assert_eq!(stats.window_size(), 100);
    }

    #[test]
    fn test_record_episode() {
        let mut stats = EpisodeStats::new(100);
        stats.record_episode(15.5, 150, 5, Some(Termination::Wall));

        assert_eq!(stats.total_episodes(), 1);
        assert_eq!(stats.total_steps(), 150);
        assert_eq!(stats.mean_episode_reward(), 15.5);
        assert_eq!(stats.mean_episode_length(), 150.0);
        assert_eq!(stats.mean_episode_score(), 5.0);
        assert_eq!(stats.best_score(), 5);
        assert_eq!(stats.termination_count(Termination::Wall), 1);
    }

    #[test]
    fn test_rolling_average() {
        let mut stats = EpisodeStats::new(3);

        stats.record_episode(10.0, 100, 1, None);
        stats.record_episode(20.0, 200, 2, None);
        stats.record_episode(30.0, 300, 3, None);
        assert!((stats.mean_episode_reward() - 20.0).abs() < 1e-5);

        // Oldest value drops out
        stats.record_episode(40.0, 400, 4, None);
        assert!((stats.mean_episode_reward() - 30.0).abs() < 1e-5);
        assert!((stats.mean_episode_length() - 300.0).abs() < 1e-5);
        assert!((stats.mean_episode_score() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_totals_outlive_window() {
        let mut stats = EpisodeStats::new(2);
        stats.record_episode(-10.0, 10, 9, Some(Termination::SelfCollision));
        stats.record_episode(-10.0, 20, 0, Some(Termination::Timeout));
        stats.record_episode(-10.0, 30, 1, Some(Termination::Timeout));

        assert_eq!(stats.total_episodes(), 3);
        assert_eq!(stats.total_steps(), 60);
        assert_eq!(stats.best_score(), 9);
        assert_eq!(stats.termination_count(Termination::SelfCollision), 1);
        assert_eq!(stats.termination_count(Termination::Timeout), 2);
    }

    #[test]
    fn test_format_summary() {
        let mut stats = EpisodeStats::new(100);
        stats.record_episode(15.5, 150, 5, Some(Termination::Wall));

        let summary = stats.format_summary();
        assert!(summary.contains("Episodes: 1"));
        assert!(summary.contains("Steps: 150"));
        assert!(summary.contains("Reward: 15.50"));
        assert!(summary.contains("Best: 5"));
        assert!(summary.contains("Wall/Self/Timeout: 1/0/0"));
    }

    #[test]
    fn test_empty_stats() {
        let stats = EpisodeStats::new(100);
        assert_eq!(stats.mean_episode_reward(), 0.0);
        assert_eq!(stats.mean_episode_length(), 0.0);
        assert_eq!(stats.mean_episode_score(), 0.0);
    }
}
