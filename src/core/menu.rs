use ratatui::{
    widgets::{Block, Borders, List, ListItem, Paragraph},
    layout::{Alignment, Layout, Constraint, Direction},
    style::{Style, Color, Modifier},
    Frame,
};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use std::time::Duration;
use anyhow::Result;
use tracing::debug;

use crate::core::activity::ActivityHandle;
use crate::core::game::Difficulty;
use crate::games::GameInfo;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuChoice {
    Play { id: &'static str, difficulty: Difficulty },
    Quit,
}

pub struct ArcadeMenu {
    pub selected_game_index: usize,
    pub difficulty: Difficulty,
    /// Status line from the last finished game.
    pub last_result: Option<String>,
}

impl ArcadeMenu {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            selected_game_index: 0,
            difficulty,
            last_result: None,
        }
    }

    pub async fn run(
        &mut self,
        terminal: &mut ratatui::DefaultTerminal,
        games: &[GameInfo],
        activity: &ActivityHandle,
    ) -> Result<MenuChoice> {
        loop {
            terminal.draw(|f| self.render(f, games))?;

            if event::poll(Duration::from_millis(16))? {
                if let Some(choice) = self.handle_event(event::read()?, games, activity).await {
                    return Ok(choice);
                }
            }
        }
    }

    /// Keys drive the menu; focus changes pause and resume the activity timer.
    pub async fn handle_event(
        &mut self,
        event: Event,
        games: &[GameInfo],
        activity: &ActivityHandle,
    ) -> Option<MenuChoice> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key.code, games),
            Event::FocusLost => {
                debug!("menu lost focus");
                activity.pause().await;
                None
            }
            Event::FocusGained => {
                debug!("menu gained focus");
                activity.resume().await;
                None
            }
            _ => None,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode, games: &[GameInfo]) -> Option<MenuChoice> {
        match code {
            KeyCode::Enter => games
                .get(self.selected_game_index)
                .map(|g| MenuChoice::Play { id: g.id, difficulty: self.difficulty }),
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_game_index = self.selected_game_index.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected_game_index = (self.selected_game_index + 1).min(games.len().saturating_sub(1));
                None
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.difficulty = self.difficulty.prev();
                None
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.difficulty = self.difficulty.next();
                None
            }
            KeyCode::Char('q') | KeyCode::Esc => Some(MenuChoice::Quit),
            _ => None,
        }
    }

    fn render(&self, f: &mut Frame, games: &[GameInfo]) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(2)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(f.area());

        f.render_widget(
            Paragraph::new(" PUZZTERM ")
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center),
            chunks[0]
        );

        let items: Vec<ListItem> = games.iter().enumerate().map(|(i, g)| {
            let style = if i == self.selected_game_index {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(format!(" » {} : {}", g.name, g.description)).style(style)
        }).collect();

        f.render_widget(
            List::new(items).block(Block::default().title(" PUZZLES ").borders(Borders::ALL)),
            chunks[1]
        );

        let difficulty_line: Vec<String> = Difficulty::ALL
            .iter()
            .map(|d| if *d == self.difficulty { format!("[{d}]") } else { format!(" {d} ") })
            .collect();
        f.render_widget(
            Paragraph::new(difficulty_line.join("  "))
                .block(Block::default().title(" DIFFICULTY ").borders(Borders::ALL))
                .alignment(Alignment::Center),
            chunks[2]
        );

        let footer = match &self.last_result {
            Some(result) => format!("{result}   [↑/↓] Game  [←/→] Difficulty  [Enter] Play  [Q] Quit"),
            None => "[↑/↓] Game  [←/→] Difficulty  [Enter] Play  [Q] Quit".to_string(),
        };
        f.render_widget(Paragraph::new(footer).alignment(Alignment::Center), chunks[3]);
    }
}
