//! Watch an agent play
//!
//! # Controls
//!
//! - Space: Pause/unpause
//! - R: Reset episode
//! - 1-4: Speed control (1=slow, 2=normal, 3=fast, 4=configured tick rate)
//! - Q/Esc: Quit

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use tokio::time::{interval, Interval};
use tracing::{info, warn};

use super::{restore_terminal, setup_terminal, Pace, Tui, RENDER_INTERVAL};
use crate::agent::Agent;
use crate::game::{GameConfig, GameEngine, GameError};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::{GameMetrics, GameOutcome};
use crate::render::{Hud, Renderer, Theme};

const CONTROLS: &str = "Space pause | R reset | 1-4 speed | Q quit";

/// Terminal playback of an agent, restarting after each episode
pub struct WatchMode<A: Agent> {
    engine: GameEngine,
    agent: A,
    renderer: Renderer,
    input_handler: InputHandler,
    metrics: GameMetrics,
    should_quit: bool,
    paused: bool,
    pace: Pace,
    episode_count: usize,
    title: String,
}

impl<A: Agent> WatchMode<A> {
    pub fn new(config: GameConfig, agent: A) -> Result<Self> {
        let engine = GameEngine::new(config).context("Failed to start game")?;
        let title = format!("Snake - {} agent", agent.name());

        Ok(Self {
            engine,
            agent,
            renderer: Renderer::new(Theme::default()),
            input_handler: InputHandler::new(),
            metrics: GameMetrics::new(),
            should_quit: false,
            paused: false,
            pace: Pace::Configured,
            episode_count: 1,
            title,
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
                    if !self.paused {
                        self.tick()?;
                    }
                }

                _ = render_timer.tick() => {
                    self.metrics.refresh_clock();
                    let hud = Hud {
                        mode: &self.title,
                        metrics: &self.metrics,
                        episode: Some(self.episode_count),
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

    /// Advance one tick: step the agent, or start the next episode if the
    /// last one ended
    fn tick(&mut self) -> Result<()> {
        if !self.engine.state().is_alive {
            return self.next_episode();
        }

        let action = self.agent.act(&self.engine);
        match self.engine.step(action) {
            Ok(result) => {
                if let Some(cause) = result.info.termination {
                    info!(
                        episode = self.episode_count,
                        score = result.score,
                        ?cause,
                        "episode finished"
                    );
                    self.metrics
                        .record_game_over(result.score, GameOutcome::Terminated(cause));
                }
            }
            Err(GameError::FoodUnplaceable { .. }) => {
                warn!(episode = self.episode_count, "board full, no room for food");
                self.metrics
                    .record_game_over(self.engine.state().score, GameOutcome::BoardFull);
            }
            Err(err) => return Err(err).context("Game step failed"),
        }

        Ok(())
    }

    fn next_episode(&mut self) -> Result<()> {
        self.engine.reset().context("Failed to reset game")?;
        self.metrics.start_episode();
        self.episode_count += 1;
        Ok(())
    }

    fn handle_event(&mut self, event: Event, tick_timer: &mut Interval) -> Result<()> {
        if let Event::Key(key) = event {
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Quit => self.should_quit = true,
                KeyAction::Pause => self.paused = !self.paused,
                KeyAction::Restart => self.next_episode()?,
                KeyAction::Speed(pace) => self.change_pace(pace, tick_timer),
                // The agent steers
                KeyAction::Heading(_) | KeyAction::None => {}
            }
        }

        Ok(())
    }

    fn change_pace(&mut self, pace: Pace, tick_timer: &mut Interval) {
        self.pace = pace;
        tick_timer.reset_after(pace.tick_interval(self.engine.config()));
    }
}
