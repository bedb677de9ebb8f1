use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use std::time::Duration;
use tokio::time::interval;
use tracing::info;

use super::tui::{restore_terminal, setup_terminal, Tui, RENDER_INTERVAL};
use crate::game::{Action, GameConfig, SnakeSimulation};
use crate::input::{InputHandler, KeyAction, KeyboardController};
use crate::metrics::GameMetrics;
use crate::render::{HudLine, Renderer};

/// Game ticks at 8 Hz (125ms per tick)
const TICK_INTERVAL: Duration = Duration::from_millis(125);

/// Heading a fresh snake starts with
const START_HEADING: Action = Action::Right;

pub struct HumanMode {
    sim: SnakeSimulation,
    keyboard: KeyboardController,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        let sim = SnakeSimulation::new(config).context("Failed to create simulation")?;

        Ok(Self {
            sim,
            keyboard: KeyboardController::new(START_HEADING),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        restore_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = interval(TICK_INTERVAL);
        let mut render_timer = interval(RENDER_INTERVAL);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    if !self.sim.is_over() {
                        self.update_game()?;
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    let snapshot = self.sim.snapshot();
                    let hud = self.hud();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &hud);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
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

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Turn(action) => {
                    self.keyboard.request(action);
                }
                KeyAction::Restart => self.reset_game(),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }
    }

    fn update_game(&mut self) -> Result<()> {
        let action = self.keyboard.next_action();
        let result = self.sim.step(action)?;

        if result.done {
            self.metrics.on_game_over(self.sim.score(), result.info.termination);
            info!(
                score = self.sim.score(),
                ticks = self.sim.ticks(),
                termination = ?result.info.termination,
                "game over"
            );
        }

        Ok(())
    }

    fn reset_game(&mut self) {
        self.sim.reset();
        self.keyboard.reset(START_HEADING);
        self.metrics.on_game_start();
    }

    fn hud(&self) -> HudLine {
        HudLine::new()
            .item("Time", self.metrics.format_time())
            .item("Best", self.metrics.format_best())
            .item("Last", self.metrics.format_last_end())
            .control("↑↓←→/WASD", "to move")
            .control("R", "to restart")
            .control("Q", "to quit")
    }
}
