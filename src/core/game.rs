/// Core puzzle interface for the puzzterm arcade
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crossterm::event::KeyEvent;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

/// Challenge level picked from the menu or the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Hard,
            Difficulty::Medium => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Medium,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{other}' (expected easy, medium or hard)")),
        }
    }
}

/// Outcomes a game reports back to the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Solved { game: String, score: u32 },
    Failed { game: String, reason: String },
    Notice(String),
}

/// Handle passed into every game callback; events flow to the engine outbox
#[derive(Clone)]
pub struct Context {
    tx: UnboundedSender<GameEvent>,
}

impl Context {
    pub fn new(tx: UnboundedSender<GameEvent>) -> Self {
        Self { tx }
    }

    pub fn emit(&self, event: GameEvent) {
        // The receiver only goes away when the engine is shutting down.
        let _ = self.tx.send(event);
    }
}

/// Main game trait that every puzzle implements
pub trait PuzzleGame: Send {
    /// Stable id used by the registry and activity reports
    fn id(&self) -> &'static str;

    /// How often `on_tick` should fire. `None` for purely click-driven puzzles.
    fn tick_rate(&self) -> Option<Duration> {
        None
    }

    fn on_tick(&mut self, _dt_ms: u32, _ctx: &Context) {}

    fn handle_input(&mut self, event: KeyEvent, ctx: &Context);

    fn render(&self, frame: &mut ratatui::Frame);
}
