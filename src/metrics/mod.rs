pub mod evaluation_stats;
pub mod game_metrics;

pub use evaluation_stats::EvaluationStats;
pub use game_metrics::GameMetrics;
