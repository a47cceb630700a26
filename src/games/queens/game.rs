use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::debug;

use super::board::{Placement, QueensBoard, QueensChallenge, QueensVariant, Rejection};
use crate::core::game::{Context, Difficulty, GameEvent, PuzzleGame};
use crate::games::grid::{board_table, screen_chunks, Cursor};

pub struct QueensGame {
    board: QueensBoard,
    cursor: Cursor,
    message: String,
    solved: bool,
}

impl QueensGame {
    pub fn new(challenge: QueensChallenge) -> Self {
        let message = match challenge.variant {
            QueensVariant::NonAttacking => format!("Place {} queens so that none attack each other.", challenge.target),
            QueensVariant::Domination => format!("Cover every square using at most {} queens.", challenge.target),
        };
        Self {
            board: QueensBoard::new(challenge),
            cursor: Cursor::new(challenge.size),
            message,
            solved: false,
        }
    }

    pub fn non_attacking(difficulty: Difficulty) -> Self {
        Self::new(QueensChallenge::non_attacking(difficulty))
    }

    pub fn domination(difficulty: Difficulty) -> Self {
        Self::new(QueensChallenge::domination(difficulty))
    }

    pub fn board(&self) -> &QueensBoard {
        &self.board
    }

    fn press(&mut self, ctx: &Context) {
        if self.solved {
            return;
        }
        let cell = self.cursor.cell;
        let placement = self.board.toggle(cell);
        debug!(?cell, ?placement, "queens click");

        self.message = match placement {
            Placement::Placed => format!("Queen placed on ({}, {}).", cell.row, cell.col),
            Placement::Removed => format!("Queen removed from ({}, {}).", cell.row, cell.col),
            Placement::Rejected(Rejection::UnderAttack) => "That square is under attack!".to_string(),
            Placement::Rejected(Rejection::TargetReached) => {
                "All queens are on the board. Remove one first.".to_string()
            }
            Placement::Rejected(Rejection::OutOfBoard) => "Off the board.".to_string(),
        };

        if self.board.is_won() {
            self.solved = true;
            let challenge = self.board.challenge();
            let score = (challenge.size * 10 + (challenge.target - self.board.queens().len()) * 25) as u32;
            self.message = format!("Solved with {} queens!", self.board.queens().len());
            ctx.emit(GameEvent::Solved { game: self.id().to_string(), score });
        }
    }
}

impl PuzzleGame for QueensGame {
    fn id(&self) -> &'static str {
        match self.board.challenge().variant {
            QueensVariant::NonAttacking => "queens",
            QueensVariant::Domination => "domination",
        }
    }

    fn handle_input(&mut self, event: KeyEvent, ctx: &Context) {
        if self.cursor.handle_key(event.code) {
            return;
        }
        match event.code {
            KeyCode::Enter | KeyCode::Char(' ') => self.press(ctx),
            KeyCode::Char('r') => {
                self.board.reset();
                self.solved = false;
                self.message = "Board cleared.".to_string();
            }
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        let [header, status, body, footer] = screen_chunks(frame.area());
        let challenge = self.board.challenge();

        let title = match challenge.variant {
            QueensVariant::NonAttacking => "♛ ═══ N-QUEENS ═══ ♛",
            QueensVariant::Domination => "♛ ═══ DOMINATION ═══ ♛",
        };
        frame.render_widget(
            Paragraph::new(title)
                .block(Block::default().borders(Borders::ALL))
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center),
            header,
        );

        let counter = format!("Queens: {}/{}  {}", self.board.queens().len(), challenge.target, self.message);
        frame.render_widget(
            Paragraph::new(counter)
                .block(Block::default().borders(Borders::ALL).title("Status"))
                .style(Style::default().fg(if self.solved { Color::Green } else { Color::Yellow })),
            status,
        );

        let covered = match challenge.variant {
            QueensVariant::Domination => self.board.coverage(),
            QueensVariant::NonAttacking => Default::default(),
        };
        let table = board_table(challenge.size, "Board", Some(self.cursor.cell), |cell| {
            if self.board.is_occupied(cell) {
                ("♛".to_string(), Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD))
            } else if covered.contains(&cell) {
                ("·".to_string(), Style::default().fg(Color::Green))
            } else {
                (" ".to_string(), Style::default())
            }
        });
        frame.render_widget(table, body);

        frame.render_widget(
            Paragraph::new("[←↑↓→] Move  [Enter] Place/Remove  [R] Reset  [Esc] Back")
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center),
            footer,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn keyboard_solution_emits_solved_once() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let ctx = Context::new(tx);
        let mut game = QueensGame::domination(Difficulty::Easy);

        // (1,1) then (1,2)
        game.handle_input(key(KeyCode::Down), &ctx);
        game.handle_input(key(KeyCode::Right), &ctx);
        game.handle_input(key(KeyCode::Enter), &ctx);
        game.handle_input(key(KeyCode::Right), &ctx);
        game.handle_input(key(KeyCode::Enter), &ctx);

        assert!(game.board().is_won());
        assert!(matches!(rx.try_recv(), Ok(GameEvent::Solved { ref game, .. }) if game == "domination"));

        game.handle_input(key(KeyCode::Enter), &ctx);
        assert!(rx.try_recv().is_err());
        assert_eq!(game.board().queens().len(), 2);
    }
}
