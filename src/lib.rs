pub mod core {
	pub mod activity;
	pub mod api;
	pub mod config;
	pub mod engine;
	pub mod forms;
	pub mod game;
	pub mod listing;
	pub mod menu;
	pub mod session;
}

pub mod cli;
pub mod games;

// Re-export for convenience
pub use crate::core::game::{Context, Difficulty, PuzzleGame};
