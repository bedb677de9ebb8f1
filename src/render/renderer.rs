use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::game::{Position, RenderSnapshot};

/// Extra label/value pairs shown next to the score
#[derive(Debug, Clone, Default)]
pub struct HudLine {
    pub items: Vec<(String, String)>,
    /// Key hints for the footer
    pub controls: Vec<(String, String)>,
}

impl HudLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.items.push((label.into(), value.into()));
        self
    }

    pub fn control(mut self, key: impl Into<String>, what: impl Into<String>) -> Self {
        self.controls.push((key.into(), what.into()));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Head,
    Body,
    Food,
    Empty,
}

fn cell_at(snapshot: &RenderSnapshot, pos: Position) -> Cell {
    if snapshot.head() == Some(pos) {
        Cell::Head
    } else if snapshot.snake.contains(&pos) {
        Cell::Body
    } else if snapshot.food == Some(pos) {
        Cell::Food
    } else {
        Cell::Empty
    }
}

/// Draws a [`RenderSnapshot`] into a ratatui frame
///
/// Owns no game state; callers hand it a fresh snapshot every frame.
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, snapshot: &RenderSnapshot, hud: &HudLine) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(snapshot, hud), chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        if snapshot.over {
            frame.render_widget(self.render_game_over(snapshot), game_area);
        } else {
            frame.render_widget(self.render_grid(snapshot), game_area);
        }

        frame.render_widget(self.render_controls(hud), chunks[2]);
    }

    fn render_grid(&self, snapshot: &RenderSnapshot) -> Paragraph<'_> {
        let mut lines = Vec::with_capacity(snapshot.grid.height);

        for y in 0..snapshot.grid.height {
            let spans: Vec<Span> = (0..snapshot.grid.width)
                .map(|x| {
                    let pos = Position::new(x as i32, y as i32);
                    match cell_at(snapshot, pos) {
                        Cell::Head => Span::styled(
                            "■ ",
                            Style::default()
                                .fg(Color::Cyan)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Cell::Body => Span::styled("□ ", Style::default().fg(Color::Green)),
                        Cell::Food => Span::styled(
                            "O ",
                            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                        ),
                        Cell::Empty => Span::styled(". ", Style::default().fg(Color::DarkGray)),
                    }
                })
                .collect();
            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, snapshot: &RenderSnapshot, hud: &HudLine) -> Paragraph<'_> {
        let mut spans = vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Length: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.snake.len().to_string(),
                Style::default().fg(Color::White),
            ),
        ];
        for (label, value) in &hud.items {
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                format!("{}: ", label),
                Style::default().fg(Color::Yellow),
            ));
            spans.push(Span::styled(value.clone(), Style::default().fg(Color::White)));
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }

    fn render_game_over(&self, snapshot: &RenderSnapshot) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, hud: &HudLine) -> Paragraph<'_> {
        let mut spans = Vec::new();
        for (i, (key, what)) in hud.controls.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" | "));
            }
            spans.push(Span::styled(key.clone(), Style::default().fg(Color::Cyan)));
            spans.push(Span::raw(format!(" {}", what)));
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
