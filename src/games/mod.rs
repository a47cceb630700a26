pub mod bingo;
pub mod climb;
pub mod grid;
pub mod knight;
pub mod macros;
pub mod queens;

use crate::core::game::{Difficulty, PuzzleGame};
use crate::register_games;

/// Metadata about a game
#[derive(Clone, Debug)]
pub struct GameInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub author: &'static str,
}

/// Builds a fresh game for the chosen difficulty
pub type GameLauncher = fn(Difficulty) -> Box<dyn PuzzleGame>;

/// Registry entry containing metadata and launcher
pub struct GameEntry {
    pub info: GameInfo,
    pub launcher: GameLauncher,
}

impl GameEntry {
    pub fn launch(&self, difficulty: Difficulty) -> Box<dyn PuzzleGame> {
        (self.launcher)(difficulty)
    }
}

// Register all games here - developers only need to add a new entry
register_games! {
    queens => {
        build: QueensGame::non_attacking,
        id: "queens",
        name: "N-Queens",
        description: "Place N queens so that none attack each other",
        author: "Puzzterm Team"
    },
    queens => {
        build: QueensGame::domination,
        id: "domination",
        name: "Queen Domination",
        description: "Cover the whole board with as few queens as possible",
        author: "Puzzterm Team"
    },
    knight => {
        build: KnightGame::for_difficulty,
        id: "knight",
        name: "Knight's Tour",
        description: "Visit every square exactly once with knight jumps",
        author: "Puzzterm Team"
    },
    bingo => {
        build: BingoGame::for_difficulty,
        id: "bingo",
        name: "Number Bingo",
        description: "Pick every number matching the rule before time runs out",
        author: "Puzzterm Team"
    },
    climb => {
        build: ClimbGame::for_difficulty,
        id: "climb",
        name: "CrossClimb",
        description: "Find the hidden path up the mountain, one step at a time",
        author: "Puzzterm Team"
    },
}
