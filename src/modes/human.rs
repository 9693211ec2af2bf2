use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use tokio::time::{interval, Interval};
use tracing::{info, warn};

use super::{restore_terminal, setup_terminal, Pace, Tui, RENDER_INTERVAL};
use crate::game::{Action, Direction, GameConfig, GameEngine, GameError};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::{GameMetrics, GameOutcome};
use crate::render::{Hud, Renderer, Theme};

const CONTROLS: &str = "↑↓←→ or WASD to steer | Space pause | R restart | 1-4 speed | Q quit";

/// Keyboard play. Absolute key presses are turned into relative actions at
/// the next tick.
pub struct HumanMode {
    engine: GameEngine,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    paused: bool,
    pace: Pace,
    pending_heading: Option<Direction>,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        let engine = GameEngine::new(config).context("Failed to start game")?;

        Ok(Self {
            engine,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(Theme::default()),
            input_handler: InputHandler::new(),
            should_quit: false,
            paused: false,
            pace: Pace::Normal,
            pending_heading: None,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;

        let result = self.run_game_loop(&mut terminal).await;

        restore_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = interval(self.pace.tick_interval(self.engine.config()));
        let mut render_timer = interval(RENDER_INTERVAL);

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, &mut tick_timer)?;
                    }
                }

                _ = tick_timer.tick() => {
                    if self.engine.state().is_alive && !self.paused {
                        self.update_game()?;
                    }
                }

                _ = render_timer.tick() => {
                    if self.engine.state().is_alive {
                        self.metrics.refresh_clock();
                    }
                    let hud = Hud {
                        mode: "Snake",
                        metrics: &self.metrics,
                        episode: None,
                        speed: Some(self.pace.label()),
                        paused: self.paused,
                        controls: CONTROLS,
                    };
                    terminal.draw(|frame| {
                        self.renderer.render(frame, self.engine.state(), &hud);
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

    fn handle_event(&mut self, event: Event, tick_timer: &mut Interval) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Heading(direction) => self.pending_heading = Some(direction),
                KeyAction::Restart => self.reset_game()?,
                KeyAction::Pause => self.paused = !self.paused,
                KeyAction::Speed(pace) => {
                    self.pace = pace;
                    tick_timer.reset_after(pace.tick_interval(self.engine.config()));
                }
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }

        Ok(())
    }

    /// Relative action for the pending key press, if any
    fn next_action(&mut self) -> Action {
        let current = self.engine.state().snake.direction;
        self.pending_heading
            .take()
            .map(|desired| Action::toward(current, desired))
            .unwrap_or(Action::Straight)
    }

    fn update_game(&mut self) -> Result<()> {
        let action = self.next_action();

        match self.engine.step(action) {
            Ok(result) => {
                if let Some(cause) = result.info.termination {
                    info!(score = result.score, ?cause, "game over");
                    self.metrics
                        .record_game_over(result.score, GameOutcome::Terminated(cause));
                }
            }
            Err(GameError::FoodUnplaceable { .. }) => {
                // The board is full: the player has won
                warn!(score = self.engine.state().score, "no room left for food");
                self.metrics
                    .record_game_over(self.engine.state().score, GameOutcome::BoardFull);
            }
            Err(err) => return Err(err).context("Game step failed"),
        }

        Ok(())
    }

    fn reset_game(&mut self) -> Result<()> {
        self.engine.reset().context("Failed to reset game")?;
        self.metrics.start_episode();
        self.pending_heading = None;
        Ok(())
    }
}
