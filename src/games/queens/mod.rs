/// Queens module - placement rules live in `board`, the screen in `game`
pub mod board;
pub mod game;

pub use board::{attacks, Placement, QueensBoard, QueensChallenge, QueensVariant, Rejection};
pub use game::QueensGame;
