use std::time::{Duration, Instant};

use crate::game::Termination;

/// Session bookkeeping for the interactive modes
///
/// Episode time restarts with every game; the best score and the game count
/// span the whole session.
pub struct GameMetrics {
    episode_start: Instant,
    pub elapsed: Duration,
    pub best_score: Option<i32>,
    pub games_played: u32,
    pub last_termination: Option<Termination>,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            episode_start: Instant::now(),
            elapsed: Duration::ZERO,
            best_score: None,
            games_played: 0,
            last_termination: None,
        }
    }

    /// Refresh the episode clock; call once per rendered frame
    pub fn update(&mut self) {
        self.elapsed = self.episode_start.elapsed();
    }

    pub fn on_game_start(&mut self) {
        self.episode_start = Instant::now();
        self.elapsed = Duration::ZERO;
    }

    pub fn on_game_over(&mut self, final_score: i32, termination: Option<Termination>) {
        self.games_played += 1;
        self.last_termination = termination;
        self.best_score = Some(self.best_score.map_or(final_score, |best| best.max(final_score)));
    }

    /// Episode time as `MM:SS`
    pub fn format_time(&self) -> String {
        let secs = self.elapsed.as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    pub fn format_best(&self) -> String {
        match self.best_score {
            Some(score) => score.to_string(),
            None => "-".to_string(),
        }
    }

    pub fn format_last_end(&self) -> &'static str {
        match self.last_termination {
            Some(Termination::Wall) => "wall",
            Some(Termination::SelfCollision) => "bit itself",
            Some(Termination::IdleTimeout) => "starved",
            Some(Termination::BoardFilled) => "board full",
            None => "-",
        }
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_formatting() {
        let mut metrics = GameMetrics::new();
        for (secs, expected) in [(0, "00:00"), (125, "02:05"), (3661, "61:01")] {
            metrics.elapsed = Duration::from_secs(secs);
            assert_eq!(metrics.format_time(), expected);
        }
    }

    #[test]
    fn test_best_score_allows_negative_scores() {
        let mut metrics = GameMetrics::new();
        assert_eq!(metrics.format_best(), "-");

        metrics.on_game_over(-1, Some(Termination::Wall));
        assert_eq!(metrics.best_score, Some(-1));

        metrics.on_game_over(4, Some(Termination::IdleTimeout));
        metrics.on_game_over(2, Some(Termination::SelfCollision));
        assert_eq!(metrics.best_score, Some(4));
        assert_eq!(metrics.games_played, 3);
        assert_eq!(metrics.format_best(), "4");
        assert_eq!(metrics.format_last_end(), "bit itself");
    }

    #[test]
    fn test_game_start_resets_episode_clock() {
        let mut metrics = GameMetrics::new();
        std::thread::sleep(Duration::from_millis(50));
        metrics.update();
        assert!(metrics.elapsed >= Duration::from_millis(50));

        metrics.on_game_over(0, None);
        metrics.on_game_start();
        metrics.update();
        assert!(metrics.elapsed < Duration::from_millis(50));
        assert_eq!(metrics.games_played, 1);
    }
}
