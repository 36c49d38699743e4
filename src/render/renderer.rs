use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Context, Rectangle},
        Block, BorderType, Borders, Paragraph,
    },
    Frame,
};

use super::scene::{build_scene, Shape};
use crate::game::{GameConfig, GameState};

/// Text shown around the playfield
#[derive(Debug, Clone, Default)]
pub struct Hud {
    /// Label/value pairs for the header
    pub stats: Vec<(&'static str, String)>,
    /// Key/description pairs for the footer
    pub controls: Vec<(&'static str, &'static str)>,
    /// Extra line for the game over screen
    pub game_over_hint: Option<&'static str>,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState, config: &GameConfig, hud: &Hud) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(hud), chunks[0]);

        // Center the playfield horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(20),
                Constraint::Percentage(60),
                Constraint::Percentage(20),
            ])
            .split(chunks[1])[1];

        if state.is_alive {
            frame.render_widget(self.render_world(state, config), game_area);
        } else {
            frame.render_widget(self.render_game_over(state, hud), game_area);
        }

        frame.render_widget(self.render_controls(hud), chunks[2]);
    }

    fn render_world<'a>(
        &self,
        state: &'a GameState,
        config: &'a GameConfig,
    ) -> Canvas<'a, impl Fn(&mut Context) + 'a> {
        let height = config.world_height;

        Canvas::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Flappy Bird "),
            )
            .marker(Marker::Braille)
            .x_bounds([0.0, config.world_width])
            .y_bounds([0.0, height])
            .paint(move |ctx| {
                // Canvas y grows upwards, world y grows downwards
                for shape in build_scene(state, config) {
                    match shape {
                        Shape::Rect {
                            x,
                            y,
                            width,
                            height: h,
                        } => ctx.draw(&Rectangle {
                            x,
                            y: height - (y + h),
                            width,
                            height: h,
                            color: Color::Green,
                        }),
                        Shape::Circle { x, y, radius } => ctx.draw(&Circle {
                            x,
                            y: height - y,
                            radius,
                            color: Color::Red,
                        }),
                        Shape::Text { x, y, text } => ctx.print(
                            x,
                            height - y,
                            Span::styled(
                                text,
                                Style::default()
                                    .fg(Color::Yellow)
                                    .add_modifier(Modifier::BOLD),
                            ),
                        ),
                    }
                }
            })
    }

    fn render_stats(&self, hud: &Hud) -> Paragraph<'_> {
        let mut spans = Vec::new();
        for (i, (label, value)) in hud.stats.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("    "));
            }
            spans.push(Span::styled(
                format!("{}: ", label),
                Style::default().fg(Color::Yellow),
            ));
            spans.push(Span::styled(
                value.clone(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(vec![Line::from(spans)]).alignment(Alignment::Center)
    }

    fn render_game_over(&self, state: &GameState, hud: &Hud) -> Paragraph<'_> {
        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        if let Some(hint) = hud.game_over_hint {
            text.push(Line::from(""));
            text.push(Line::from(Span::styled(hint, Style::default().fg(Color::Gray))));
        }

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, hud: &Hud) -> Paragraph<'_> {
        let mut spans = Vec::new();
        for (i, (key, description)) in hud.controls.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" | "));
            }
            spans.push(Span::styled(*key, Style::default().fg(Color::Cyan)));
            spans.push(Span::raw(format!(" {}", description)));
        }

        Paragraph::new(vec![Line::from(spans)]).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameEngine;
    use ratatui::{backend::TestBackend, Terminal};

    fn hud() -> Hud {
        Hud {
            stats: vec![("Score", "3".to_string())],
            controls: vec![("Space", "jump"), ("Q", "quit")],
            game_over_hint: Some("Press R to restart"),
        }
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_render_running_game() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 0);
        let state = engine.reset();
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();

        terminal
            .draw(|frame| Renderer::new().render(frame, &state, engine.config(), &hud()))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Flappy Bird"));
        assert!(text.contains("Score: 3"));
        assert!(text.contains("jump"));
    }

    #[test]
    fn test_render_game_over() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 0);
        let mut state = engine.reset();
        state.is_alive = false;
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();

        terminal
            .draw(|frame| Renderer::new().render(frame, &state, engine.config(), &hud()))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("GAME OVER"));
        assert!(text.contains("Press R to restart"));
    }
}
