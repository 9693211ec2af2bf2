pub mod episode_stats;
pub mod game_metrics;

pub use episode_stats::EpisodeStats;
pub use game_metrics::{GameMetrics, GameOutcome};
