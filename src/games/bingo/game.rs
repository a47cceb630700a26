use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::debug;

use super::round::{BingoSession, RoundStatus, CARD_SIZE};
use crate::core::game::{Context, Difficulty, GameEvent, PuzzleGame};
use crate::games::grid::{board_table, screen_chunks, Cursor};

pub struct BingoGame {
    session: BingoSession,
    cursor: Cursor,
}

impl BingoGame {
    pub fn new(session: BingoSession) -> Self {
        Self { session, cursor: Cursor::new(CARD_SIZE) }
    }

    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let start = match difficulty {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        };
        Self::new(BingoSession::starting_at(start))
    }

    pub fn session(&self) -> &BingoSession {
        &self.session
    }

    fn report(&self, status: RoundStatus, ctx: &Context) {
        let game = self.id().to_string();
        let round = self.session.round_number();
        match status {
            RoundStatus::Won => ctx.emit(GameEvent::Solved { game, score: self.session.round().score() }),
            RoundStatus::Lost { wrong } => ctx.emit(GameEvent::Failed {
                game,
                reason: format!("round {round}: {wrong} does not match"),
            }),
            RoundStatus::TimedOut => ctx.emit(GameEvent::Failed { game, reason: format!("round {round}: time ran out") }),
            RoundStatus::Playing => {}
        }
    }

    fn press(&mut self, ctx: &Context) {
        let idx = self.cursor.cell.row * CARD_SIZE + self.cursor.cell.col;
        let Some(&number) = self.session.round().numbers().get(idx) else {
            return;
        };
        let before = self.session.round().status();
        let after = self.session.round_mut().select(number);
        debug!(number, ?after, "bingo pick");
        if before != after {
            self.report(after, ctx);
        }
    }

    fn status_line(&self) -> String {
        let round = self.session.round();
        match round.status() {
            RoundStatus::Playing => round.spec().predicate.prompt().to_string(),
            RoundStatus::Won => format!("Round won! +{} points. Press N for the next round.", round.score()),
            RoundStatus::Lost { wrong } => format!("{wrong} was wrong. Round lost. Press N to continue."),
            RoundStatus::TimedOut => "Time's up! Press N to continue.".to_string(),
        }
    }
}

impl PuzzleGame for BingoGame {
    fn id(&self) -> &'static str {
        "bingo"
    }

    fn tick_rate(&self) -> Option<Duration> {
        Some(Duration::from_millis(100))
    }

    fn on_tick(&mut self, dt_ms: u32, ctx: &Context) {
        let before = self.session.round().status();
        let after = self.session.round_mut().tick(Duration::from_millis(u64::from(dt_ms)));
        if before != after {
            self.report(after, ctx);
        }
    }

    fn handle_input(&mut self, event: KeyEvent, ctx: &Context) {
        if self.cursor.handle_key(event.code) {
            return;
        }
        match event.code {
            KeyCode::Enter | KeyCode::Char(' ') => self.press(ctx),
            KeyCode::Char('n') => {
                if self.session.advance() {
                    self.cursor = Cursor::new(CARD_SIZE);
                } else if self.session.is_finished() {
                    ctx.emit(GameEvent::Notice(format!("Bingo finished with {} points", self.session.total_score())));
                }
            }
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        let [header, status, body, footer] = screen_chunks(frame.area());
        let round = self.session.round();

        frame.render_widget(
            Paragraph::new(format!(
                "🎱 BINGO - Round {} ({})  Score: {}",
                self.session.round_number(),
                round.spec().label,
                self.session.total_score()
            ))
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
            header,
        );

        let colour = match round.status() {
            RoundStatus::Playing => Color::Yellow,
            RoundStatus::Won => Color::Green,
            _ => Color::Red,
        };
        frame.render_widget(
            Paragraph::new(format!("⏱ {:>4.1}s  {}", round.remaining().as_secs_f32(), self.status_line()))
                .block(Block::default().borders(Borders::ALL).title("Status"))
                .style(Style::default().fg(colour)),
            status,
        );

        let lost_on = match round.status() {
            RoundStatus::Lost { wrong } => Some(wrong),
            _ => None,
        };
        let table = board_table(CARD_SIZE, "Card", Some(self.cursor.cell), |cell| {
            let n = round.numbers()[cell.row * CARD_SIZE + cell.col];
            let style = if round.selected().contains(&n) {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else if lost_on == Some(n) {
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            (format!("{n:>2}"), style)
        });
        frame.render_widget(table, body);

        frame.render_widget(
            Paragraph::new("[←↑↓→] Move  [Enter] Select  [N] Next round  [Esc] Back")
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center),
            footer,
        );
    }
}
