use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::game::{GameState, Position};
use crate::metrics::GameMetrics;

/// Cell glyphs and colours, built once and handed to the [`Renderer`]
#[derive(Debug, Clone)]
pub struct Theme {
    pub head: Style,
    pub body: Style,
    pub food: Style,
    pub empty: Style,
    pub border: Style,
    pub label: Style,
    pub value: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            head: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            body: Style::default().fg(Color::Blue),
            food: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            empty: Style::default().fg(Color::DarkGray),
            border: Style::default().fg(Color::White),
            label: Style::default().fg(Color::Yellow),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        }
    }
}

/// Per-frame overlay data supplied by the running mode
#[derive(Debug, Clone, Copy)]
pub struct Hud<'a> {
    pub mode: &'a str,
    pub metrics: &'a GameMetrics,
    pub episode: Option<usize>,
    pub speed: Option<&'a str>,
    pub paused: bool,
    pub controls: &'a str,
}

/// Draws a read-only view of the episode
pub struct Renderer {
    theme: Theme,
}

impl Renderer {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState, hud: &Hud) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(state, hud), chunks[0]);

        if state.is_alive {
            frame.render_widget(self.render_grid(state, hud), chunks[1]);
        } else {
            frame.render_widget(self.render_game_over(state, hud), chunks[1]);
        }

        frame.render_widget(self.render_controls(hud), chunks[2]);
    }

    /// One text row per grid row, two characters per cell
    pub fn grid_lines(&self, state: &GameState) -> Vec<Line<'static>> {
        let block = state.block_size;
        let head = state.snake.head();

        (0..state.height / block)
            .map(|row| {
                let spans: Vec<Span> = (0..state.width / block)
                    .map(|col| {
                        let pos = Position::new(col * block, row * block);
                        if pos == head {
                            Span::styled("■ ", self.theme.head)
                        } else if state.snake.occupies(pos) {
                            Span::styled("□ ", self.theme.body)
                        } else if pos == state.food {
                            Span::styled("● ", self.theme.food)
                        } else {
                            Span::styled(". ", self.theme.empty)
                        }
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }

    fn render_grid(&self, state: &GameState, hud: &Hud) -> Paragraph<'static> {
        let title = if hud.paused {
            format!(" {} (paused) ", hud.mode)
        } else {
            format!(" {} ", hud.mode)
        };

        Paragraph::new(self.grid_lines(state))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(self.theme.border)
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, state: &GameState, hud: &Hud) -> Paragraph<'static> {
        let mut spans = vec![
            Span::styled("Score: ", self.theme.label),
            Span::styled(state.score.to_string(), self.theme.value),
            Span::raw("    "),
            Span::styled("Best: ", self.theme.label),
            Span::styled(hud.metrics.high_score.to_string(), self.theme.value),
            Span::raw("    "),
            Span::styled("Frame: ", self.theme.label),
            Span::raw(state.frame_iteration.to_string()),
            Span::raw("    "),
            Span::styled("Length: ", self.theme.label),
            Span::raw(state.snake.len().to_string()),
            Span::raw("    "),
            Span::styled("Time: ", self.theme.label),
            Span::raw(hud.metrics.clock_label()),
        ];
        if hud.metrics.games_played > 0 {
            spans.push(Span::raw("    "));
            spans.push(Span::styled("Avg: ", self.theme.label));
            spans.push(Span::raw(format!("{:.1}", hud.metrics.mean_score())));
            spans.push(Span::raw("    "));
            spans.push(Span::styled("Last: ", self.theme.label));
            spans.push(Span::raw(hud.metrics.last_outcome_label()));
        }
        if let Some(episode) = hud.episode {
            spans.push(Span::raw("    "));
            spans.push(Span::styled("Episode: ", self.theme.label));
            spans.push(Span::raw(episode.to_string()));
        }
        if let Some(speed) = hud.speed {
            spans.push(Span::raw("    "));
            spans.push(Span::styled("Speed: ", self.theme.label));
            spans.push(Span::raw(speed.to_string()));
        }

        Paragraph::new(vec![Line::from(spans)]).alignment(Alignment::Center)
    }

    fn render_game_over(&self, state: &GameState, hud: &Hud) -> Paragraph<'static> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", self.theme.label),
                Span::styled(state.score.to_string(), self.theme.value),
            ]),
            Line::from(vec![
                Span::styled("Cause: ", self.theme.label),
                Span::raw(hud.metrics.last_outcome_label()),
            ]),
            Line::from(""),
            Line::from(vec![Span::styled(
                hud.controls.to_string(),
                Style::default().fg(Color::Gray),
            )]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, hud: &Hud) -> Paragraph<'static> {
        Paragraph::new(vec![Line::from(Span::styled(
            hud.controls.to_string(),
            Style::default().fg(Color::Cyan),
        ))])
        .alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}
