use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::debug;

use super::tour::{KnightTour, TourState};
use crate::core::game::{Context, Difficulty, GameEvent, PuzzleGame};
use crate::games::grid::{board_table, screen_chunks, Cursor};

pub struct KnightGame {
    tour: KnightTour,
    cursor: Cursor,
    message: String,
    show_hints: bool,
}

impl KnightGame {
    pub fn new(tour: KnightTour) -> Self {
        let start = tour.start();
        Self {
            cursor: Cursor::new(tour.size()),
            message: format!("Start on ({}, {}) and visit every square once.", start.row, start.col),
            tour,
            show_hints: false,
        }
    }

    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self::new(KnightTour::for_difficulty(difficulty))
    }

    pub fn tour(&self) -> &KnightTour {
        &self.tour
    }

    fn press(&mut self, ctx: &Context) {
        let cell = self.cursor.cell;
        match self.tour.visit(cell) {
            Ok(TourState::Complete) => {
                self.message = "Tour complete! Every square visited.".to_string();
                ctx.emit(GameEvent::Solved {
                    game: self.id().to_string(),
                    score: (self.tour.size() * self.tour.size() * 4) as u32,
                });
            }
            Ok(_) => {
                self.message = format!("Jumped to ({}, {}).", cell.row, cell.col);
            }
            Err(rejection) => {
                debug!(?cell, %rejection, "knight move rejected");
                self.message = rejection.to_string();
            }
        }
    }
}

impl PuzzleGame for KnightGame {
    fn id(&self) -> &'static str {
        "knight"
    }

    fn handle_input(&mut self, event: KeyEvent, ctx: &Context) {
        if self.cursor.handle_key(event.code) {
            return;
        }
        match event.code {
            KeyCode::Enter | KeyCode::Char(' ') => self.press(ctx),
            KeyCode::Char('?') => self.show_hints = !self.show_hints,
            KeyCode::Char('r') => {
                self.tour.reset();
                self.message = "Tour restarted.".to_string();
            }
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        let [header, status, body, footer] = screen_chunks(frame.area());
        let n = self.tour.size();

        frame.render_widget(
            Paragraph::new("♞ ═══ KNIGHT'S TOUR ═══ ♞")
                .block(Block::default().borders(Borders::ALL))
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center),
            header,
        );

        let done = self.tour.state() == TourState::Complete;
        frame.render_widget(
            Paragraph::new(format!("Visited: {}/{}  {}", self.tour.path().len(), n * n, self.message))
                .block(Block::default().borders(Borders::ALL).title("Status"))
                .style(Style::default().fg(if done { Color::Green } else { Color::Yellow })),
            status,
        );

        let hints = if self.show_hints { self.tour.candidates() } else { Vec::new() };
        let last = self.tour.last();
        let table = board_table(n, "Board", Some(self.cursor.cell), |cell| {
            if Some(cell) == last {
                ("♞".to_string(), Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD))
            } else if let Some(step) = self.tour.path().iter().position(|&c| c == cell) {
                (format!("{}", step + 1), Style::default().fg(Color::Blue))
            } else if hints.contains(&cell) {
                ("*".to_string(), Style::default().fg(Color::Green))
            } else {
                ("·".to_string(), Style::default().fg(Color::DarkGray))
            }
        });
        frame.render_widget(table, body);

        frame.render_widget(
            Paragraph::new("[←↑↓→] Move  [Enter] Jump  [?] Hints  [R] Restart  [Esc] Back")
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center),
            footer,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::grid::Cell;
    use crossterm::event::KeyModifiers;

    const TOUR_5X5: [(usize, usize); 25] = [
        (0, 0), (1, 2), (0, 4), (2, 3), (4, 4), (3, 2), (4, 0), (2, 1), (0, 2), (1, 4),
        (3, 3), (4, 1), (2, 0), (0, 1), (1, 3), (3, 4), (4, 2), (3, 0), (1, 1), (0, 3),
        (2, 4), (4, 3), (3, 1), (1, 0), (2, 2),
    ];

    fn jump(game: &mut KnightGame, ctx: &Context, row: usize, col: usize) {
        game.cursor.cell = Cell::new(row, col);
        game.handle_input(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), ctx);
    }

    #[test]
    fn rejection_reaches_the_status_line() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let ctx = Context::new(tx);
        let mut game = KnightGame::for_difficulty(Difficulty::Easy);

        jump(&mut game, &ctx, 2, 2);
        assert_eq!(game.message, "The tour must start on (0, 0).");
        jump(&mut game, &ctx, 0, 0);
        jump(&mut game, &ctx, 0, 1);
        assert_eq!(game.message, "A knight cannot jump from (0, 0) to (0, 1).");
        assert_eq!(game.tour().path().len(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn completed_tour_is_solved_once() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let ctx = Context::new(tx);
        let mut game = KnightGame::for_difficulty(Difficulty::Easy);

        for &(row, col) in &TOUR_5X5 {
            jump(&mut game, &ctx, row, col);
        }
        assert_eq!(rx.try_recv().unwrap(), GameEvent::Solved { game: "knight".into(), score: 100 });

        jump(&mut game, &ctx, 0, 1);
        assert_eq!(game.message, "The tour is already complete.");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn hints_toggle_and_restart() {
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let ctx = Context::new(tx);
        let mut game = KnightGame::for_difficulty(Difficulty::Easy);
        game.handle_input(KeyEvent::new(KeyCode::Char('?'), KeyModifiers::NONE), &ctx);
        assert!(game.show_hints);

        jump(&mut game, &ctx, 0, 0);
        game.handle_input(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE), &ctx);
        assert!(game.tour().path().is_empty());
    }
}
