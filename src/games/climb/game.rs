use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::debug;

use super::path::{ClimbChallenge, ClimbStatus, CrossClimb};
use crate::core::game::{Context, Difficulty, GameEvent, PuzzleGame};
use crate::games::grid::{board_table, screen_chunks, Cursor};

pub struct ClimbGame {
    climb: CrossClimb,
    cursor: Cursor,
}

impl ClimbGame {
    pub fn new(challenge: ClimbChallenge) -> Self {
        Self { cursor: Cursor::new(challenge.grid_size), climb: CrossClimb::new(challenge) }
    }

    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self::new(ClimbChallenge::for_difficulty(difficulty))
    }

    pub fn climb(&self) -> &CrossClimb {
        &self.climb
    }

    fn press(&mut self, ctx: &Context) {
        let cell = self.cursor.cell.number(self.climb.challenge().grid_size);
        let before = self.climb.status();
        let after = self.climb.click(cell);
        debug!(cell, ?after, "climb click");
        if before == after {
            return;
        }
        match after {
            ClimbStatus::Won => ctx.emit(GameEvent::Solved {
                game: self.id().to_string(),
                score: (self.climb.challenge().correct_path.len() * 50) as u32,
            }),
            ClimbStatus::Wrong => ctx.emit(GameEvent::Failed {
                game: self.id().to_string(),
                reason: format!("cell {cell} is not on the path"),
            }),
            ClimbStatus::Playing => {}
        }
    }
}

impl PuzzleGame for ClimbGame {
    fn id(&self) -> &'static str {
        "climb"
    }

    fn handle_input(&mut self, event: KeyEvent, ctx: &Context) {
        if self.cursor.handle_key(event.code) {
            return;
        }
        match event.code {
            KeyCode::Enter | KeyCode::Char(' ') => self.press(ctx),
            KeyCode::Char('r') => self.climb.reset(),
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        let [header, status, body, footer] = screen_chunks(frame.area());
        let size = self.climb.challenge().grid_size;

        frame.render_widget(
            Paragraph::new("⛰ ═══ CROSSCLIMB ═══ ⛰")
                .block(Block::default().borders(Borders::ALL))
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center),
            header,
        );

        let (text, colour) = match self.climb.status() {
            ClimbStatus::Playing => (
                format!(
                    "Climb {}/{}: find the next step of the path.",
                    self.climb.climbed().len(),
                    self.climb.challenge().correct_path.len()
                ),
                Color::Yellow,
            ),
            ClimbStatus::Won => ("You reached the summit!".to_string(), Color::Green),
            ClimbStatus::Wrong => ("Wrong step! Press R to try again.".to_string(), Color::Red),
        };
        frame.render_widget(
            Paragraph::new(text)
                .block(Block::default().borders(Borders::ALL).title("Status"))
                .style(Style::default().fg(colour)),
            status,
        );

        let table = board_table(size, "Mountain", Some(self.cursor.cell), |cell| {
            let n = cell.number(size);
            let style = if self.climb.climbed().contains(&n) {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else if self.climb.wrong_cell() == Some(n) {
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            (format!("{n:>2}"), style)
        });
        frame.render_widget(table, body);

        frame.render_widget(
            Paragraph::new("[←↑↓→] Move  [Enter] Step  [R] Retry  [Esc] Back")
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center),
            footer,
        );
    }
}
