/// Bingo module - predicate rounds in `round`, the screen in `game`
pub mod game;
pub mod round;

pub use game::BingoGame;
pub use round::{is_prime, BingoRound, BingoSession, Predicate, RoundSpec, RoundStatus, ROUNDS};
