//! Fitness statistics over evaluated episodes
//!
//! Tracks scores, fitness and episode lengths with rolling windows, plus
//! lifetime totals and a count of how each episode ended.

use std::collections::VecDeque;

use crate::agent::EpisodeReport;
use crate::game::Termination;

/// Rolling statistics over [`EpisodeReport`]s
///
/// # Example
///
/// ```rust
/// use neuro_snake::agent::EpisodeReport;
/// use neuro_snake::game::Termination;
/// use neuro_snake::metrics::EvaluationStats;
///
/// let mut stats = EvaluationStats::new(100);
/// stats.record(&EpisodeReport {
///     score: 4,
///     apple_penalty: 0,
///     ticks: 120,
///     food_eaten: 5,
///     termination: Some(Termination::Wall),
/// });
///
/// assert_eq!(stats.total_episodes(), 1);
/// assert_eq!(stats.best_fitness(), Some(4));
/// ```
#[derive(Debug, Clone)]
pub struct EvaluationStats {
    fitness: VecDeque<i64>,
    scores: VecDeque<i32>,
    lengths: VecDeque<u64>,

    best_fitness: Option<i64>,
    total_episodes: usize,
    total_ticks: u64,

    walls: usize,
    self_collisions: usize,
    timeouts: usize,
    filled: usize,

    window_size: usize,
}

impl EvaluationStats {
    /// Create a tracker keeping the last `window_size` episodes for averages
    pub fn new(window_size: usize) -> Self {
        Self {
            fitness: VecDeque::with_capacity(window_size),
            scores: VecDeque::with_capacity(window_size),
            lengths: VecDeque::with_capacity(window_size),
            best_fitness: None,
            total_episodes: 0,
            total_ticks: 0,
            walls: 0,
            self_collisions: 0,
            timeouts: 0,
            filled: 0,
            window_size: window_size.max(1),
        }
    }

    pub fn record(&mut self, report: &EpisodeReport) {
        let fitness = report.fitness();
        Self::push_deque(&mut self.fitness, fitness, self.window_size);
        Self::push_deque(&mut self.scores, report.score, self.window_size);
        Self::push_deque(&mut self.lengths, report.ticks, self.window_size);

        self.best_fitness = Some(self.best_fitness.map_or(fitness, |best| best.max(fitness)));
        self.total_episodes += 1;
        self.total_ticks += report.ticks;

        match report.termination {
            Some(Termination::Wall) => self.walls += 1,
            Some(Termination::SelfCollision) => self.self_collisions += 1,
            Some(Termination::IdleTimeout) => self.timeouts += 1,
            Some(Termination::BoardFilled) => self.filled += 1,
            None => {}
        }
    }

    pub fn record_all<'a, I>(&mut self, reports: I)
    where
        I: IntoIterator<Item = &'a EpisodeReport>,
    {
        for report in reports {
            self.record(report);
        }
    }

    pub fn mean_fitness(&self) -> f64 {
        Self::mean(self.fitness.iter().map(|&f| f as f64), self.fitness.len())
    }

    pub fn mean_score(&self) -> f64 {
        Self::mean(self.scores.iter().map(|&s| s as f64), self.scores.len())
    }

    pub fn mean_length(&self) -> f64 {
        Self::mean(self.lengths.iter().map(|&l| l as f64), self.lengths.len())
    }

    /// Best fitness seen over the tracker's lifetime
    pub fn best_fitness(&self) -> Option<i64> {
        self.best_fitness
    }

    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    /// Episodes ended by the idle timeout
    pub fn timeouts(&self) -> usize {
        self.timeouts
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Episodes: {} | Ticks: {} | Fitness: {:.2} (best {}) | Score: {:.2} | Len: {:.1} | Wall: {} | Self: {} | Timeout: {} | Filled: {}",
            self.total_episodes,
            self.total_ticks,
            self.mean_fitness(),
            self.best_fitness
                .map(|f| f.to_string())
                .unwrap_or_else(|| "-".to_string()),
            self.mean_score(),
            self.mean_length(),
            self.walls,
            self.self_collisions,
            self.timeouts,
            self.filled,
        )
    }

    fn mean(values: impl Iterator<Item = f64>, len: usize) -> f64 {
        if len == 0 {
            0.0
        } else {
            values.sum::<f64>() / len as f64
        }
    }

    fn push_deque<T>(deque: &mut VecDeque<T>, value: T, window_size: usize) {
        if deque.len() >= window_size {
            deque.pop_front();
        }
        deque.push_back(value);
    }
}
