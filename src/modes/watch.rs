//! Watch mode: a built-in controller plays while the terminal shows it
//!
//! # Controls
//!
//! - Space: Pause/unpause
//! - R: Reset episode
//! - 1-4: Speed control (1=slow, 2=normal, 3=fast, 4=very fast)
//! - Q/Esc: Quit

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind};
use futures::StreamExt;
use std::time::Duration;
use tokio::time::{interval, Interval};
use tracing::info;

use super::tui::{restore_terminal, setup_terminal, Tui, RENDER_INTERVAL};
use crate::agent::{AntiReversal, Controller};
use crate::game::{GameConfig, Observation, SnakeSimulation};
use crate::metrics::GameMetrics;
use crate::render::{HudLine, Renderer};

/// Playback speed settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackSpeed {
    /// Slow: 2 Hz (500ms per step)
    Slow,
    /// Normal: 8 Hz (125ms per step) - same as human mode
    Normal,
    /// Fast: 20 Hz (50ms per step)
    Fast,
    /// Very Fast: 60 Hz (16ms per step)
    VeryFast,
}

impl PlaybackSpeed {
    fn tick_interval(&self) -> Duration {
        match self {
            Self::Slow => Duration::from_millis(500),
            Self::Normal => Duration::from_millis(125),
            Self::Fast => Duration::from_millis(50),
            Self::VeryFast => Duration::from_millis(16),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Slow => "Slow",
            Self::Normal => "Normal",
            Self::Fast => "Fast",
            Self::VeryFast => "Very Fast",
        }
    }
}

pub struct WatchMode<K: Controller> {
    controller: K,
    sim: SnakeSimulation,
    smoothing: AntiReversal,
    observation: Observation,
    metrics: GameMetrics,
    renderer: Renderer,
    should_quit: bool,
    paused: bool,
    speed: PlaybackSpeed,
    episode_count: usize,
}

impl<K: Controller> WatchMode<K> {
    pub fn new(config: GameConfig, controller: K) -> Result<Self> {
        let sim = SnakeSimulation::new(config).context("Failed to create simulation")?;
        let observation = sim.observation();

        Ok(Self {
            controller,
            sim,
            smoothing: AntiReversal::new(),
            observation,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            should_quit: false,
            paused: false,
            speed: PlaybackSpeed::Normal,
            episode_count: 0,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;

        let result = self.run_watch_loop(&mut terminal).await;

        restore_terminal(&mut terminal)?;

        result
    }

    async fn run_watch_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = interval(self.speed.tick_interval());
        let mut render_timer = interval(RENDER_INTERVAL);

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, &mut tick_timer);
                    }
                }

                _ = tick_timer.tick() => {
                    if !self.paused {
                        self.tick()?;
                    }
                }

                _ = render_timer.tick() => {
                    self.metrics.update();
                    let snapshot = self.sim.snapshot();
                    let hud = self.hud();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &hud);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// One playback tick: step the controller, or start the next episode
    fn tick(&mut self) -> Result<()> {
        if self.sim.is_over() {
            self.restart();
            return Ok(());
        }

        let action = self.smoothing.filter(self.controller.decide(&self.observation));
        let result = self.sim.step(action)?;
        self.observation = result.observation;

        if result.done {
            self.metrics.on_game_over(self.sim.score(), result.info.termination);
            info!(
                episode = self.episode_count,
                score = self.sim.score(),
                ticks = self.sim.ticks(),
                termination = ?result.info.termination,
                "episode finished"
            );
        }
        Ok(())
    }

    fn restart(&mut self) {
        self.observation = self.sim.reset();
        self.smoothing.clear();
        self.metrics.on_game_start();
        self.episode_count += 1;
    }

    fn handle_event(&mut self, event: Event, tick_timer: &mut Interval) {
        if let Event::Key(key) = event {
            if key.kind != KeyEventKind::Press {
                return;
            }

            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                KeyCode::Char(' ') => self.paused = !self.paused,
                KeyCode::Char('r') => self.restart(),
                KeyCode::Char('1') => self.change_speed(PlaybackSpeed::Slow, tick_timer),
                KeyCode::Char('2') => self.change_speed(PlaybackSpeed::Normal, tick_timer),
                KeyCode::Char('3') => self.change_speed(PlaybackSpeed::Fast, tick_timer),
                KeyCode::Char('4') => self.change_speed(PlaybackSpeed::VeryFast, tick_timer),
                _ => {}
            }
        }
    }

    fn change_speed(&mut self, new_speed: PlaybackSpeed, tick_timer: &mut Interval) {
        self.speed = new_speed;
        *tick_timer = interval(self.speed.tick_interval());
    }

    fn hud(&self) -> HudLine {
        let state = if self.paused { "Paused" } else { "Playing" };
        HudLine::new()
            .item("Episode", (self.episode_count + 1).to_string())
            .item("Best", self.metrics.format_best())
            .item("Speed", self.speed.as_str())
            .item("State", state)
            .control("Space", "pause")
            .control("1-4", "speed")
            .control("R", "reset")
            .control("Q", "quit")
    }
}
