use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{debug, trace};

use super::{
    action::Action,
    config::{ConfigError, GameConfig},
    grid::Grid,
    state::{Position, RenderSnapshot, Snake, Status, Termination},
    timeout::{Clock, IdleTracker, SystemClock},
};

/// Reward for eating food
pub const FOOD_REWARD: i32 = 1;
/// Reward for any step that neither eats nor ends the episode
pub const STEP_REWARD: i32 = 0;
/// Reward (and score adjustment) for ending the episode by dying or idling
pub const DEATH_PENALTY: i32 = -1;

/// Number of values in an [`Observation`]
pub const OBSERVATION_SIZE: usize = 2;

/// What a controller sees each tick
///
/// Absolute distance from the head to the food along each axis. Both values
/// are zero when there is no food left on the board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation(pub [f32; OBSERVATION_SIZE]);

impl Observation {
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

/// Misuse of the simulation's state machine
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimulationError {
    #[error("episode is over; call reset() before stepping again")]
    EpisodeOver,
}

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Why the episode ended, if it did
    pub termination: Option<Termination>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: i32,
    /// Whether the game has terminated
    pub done: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The Snake state machine
///
/// Owns the snake, the food and the episode bookkeeping; everything changes
/// through [`reset`](Self::reset) and [`step`](Self::step). The clock is only
/// consulted by the wall-clock idle policy.
pub struct SnakeSimulation<C: Clock = SystemClock> {
    config: GameConfig,
    grid: Grid,
    snake: Snake,
    food: Option<Position>,
    score: i32,
    game_over: bool,
    idle: IdleTracker,
    apple_penalty: u32,
    ticks: u64,
    food_eaten: u32,
    clock: C,
    rng: StdRng,
}

impl SnakeSimulation<SystemClock> {
    /// Create a simulation on real time, ready to step
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> SnakeSimulation<C> {
    pub fn with_clock(config: GameConfig, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let grid = config.grid();
        let snake = Snake::new(grid.center(), config.initial_snake_length);
        let idle = IdleTracker::new(config.idle_timeout, clock.now());

        let mut sim = Self {
            config,
            grid,
            snake,
            food: None,
            score: 0,
            game_over: false,
            idle,
            apple_penalty: 0,
            ticks: 0,
            food_eaten: 0,
            clock,
            rng,
        };
        sim.reset();
        Ok(sim)
    }

    /// Start a new episode and return its first observation
    ///
    /// `apple_penalty` survives resets; it counts timeouts over the
    /// simulation's whole lifetime.
    pub fn reset(&mut self) -> Observation {
        self.snake = Snake::new(self.grid.center(), self.config.initial_snake_length);
        self.food = self.grid.random_free_cell(self.snake.occupied(), &mut self.rng);
        self.score = 0;
        self.game_over = false;
        self.idle = IdleTracker::new(self.config.idle_timeout, self.clock.now());
        self.ticks = 0;
        self.food_eaten = 0;

        debug!(head = ?self.snake.head(), food = ?self.food, "episode reset");
        self.observation()
    }

    /// Advance the game by one tick
    ///
    /// Stepping a finished episode is rejected with
    /// [`SimulationError::EpisodeOver`] and leaves the state untouched.
    pub fn step(&mut self, action: Action) -> Result<StepResult, SimulationError> {
        if self.game_over {
            return Err(SimulationError::EpisodeOver);
        }
        self.ticks += 1;

        let new_head = self.snake.head().moved(action);

        // The whole pre-move body counts, including the tail cell about to be freed
        if let Some(termination) = self.check_collision(new_head) {
            return Ok(self.finish(termination, false));
        }

        let ate_food = self.food == Some(new_head);
        self.snake.advance(new_head, ate_food);

        let mut reward = STEP_REWARD;
        if ate_food {
            self.score += 1;
            self.food_eaten += 1;
            self.idle.fed(self.clock.now());
            reward = FOOD_REWARD;
            self.food = self.grid.random_free_cell(self.snake.occupied(), &mut self.rng);
            trace!(score = self.score, food = ?self.food, "food eaten");

            if self.food.is_none() {
                self.game_over = true;
                debug!(score = self.score, ticks = self.ticks, "board filled");
                return Ok(self.result(reward, true, Some(Termination::BoardFilled)));
            }
        } else {
            self.idle.tick();
        }

        if self.idle.expired(self.clock.now()) {
            self.apple_penalty += 1;
            return Ok(self.finish(Termination::IdleTimeout, ate_food));
        }

        Ok(self.result(reward, false, None))
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, pos: Position) -> Option<Termination> {
        if !self.grid.contains(pos) {
            return Some(Termination::Wall);
        }
        if self.snake.contains(pos) {
            return Some(Termination::SelfCollision);
        }
        None
    }

    fn finish(&mut self, termination: Termination, ate_food: bool) -> StepResult {
        self.game_over = true;
        self.score += DEATH_PENALTY;
        debug!(
            ?termination,
            score = self.score,
            ticks = self.ticks,
            "episode over"
        );
        StepResult {
            observation: self.observation(),
            reward: DEATH_PENALTY,
            done: true,
            info: StepInfo {
                ate_food,
                termination: Some(termination),
            },
        }
    }

    fn result(&self, reward: i32, done: bool, termination: Option<Termination>) -> StepResult {
        StepResult {
            observation: self.observation(),
            reward,
            done,
            info: StepInfo {
                ate_food: reward == FOOD_REWARD,
                termination,
            },
        }
    }

    pub fn observation(&self) -> Observation {
        let head = self.snake.head();
        match self.food {
            Some(food) => Observation([
                (head.x - food.x).unsigned_abs() as f32,
                (head.y - food.y).unsigned_abs() as f32,
            ]),
            None => Observation([0.0; OBSERVATION_SIZE]),
        }
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            grid: self.grid,
            snake: self.snake.segments().collect(),
            food: self.food,
            score: self.score,
            over: self.game_over,
        }
    }

    pub fn status(&self) -> Status {
        if self.game_over {
            Status::Over
        } else {
            Status::Running
        }
    }

    pub fn is_over(&self) -> bool {
        self.game_over
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    /// Idle-timeout terminations over this simulation's lifetime
    pub fn apple_penalty(&self) -> u32 {
        self.apple_penalty
    }

    /// Steps taken in the current episode
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn food_eaten(&self) -> u32 {
        self.food_eaten
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Position> {
        self.food
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[cfg(test)]
    pub(crate) fn set_snake(&mut self, snake: Snake) {
        self.snake = snake;
    }

    #[cfg(test)]
    pub(crate) fn set_food(&mut self, food: Option<Position>) {
        self.food = food;
    }
}
