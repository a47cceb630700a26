/// Knight's tour module - move validation in `tour`, the screen in `game`
pub mod game;
pub mod tour;

pub use game::KnightGame;
pub use tour::{is_knight_move, KnightTour, TourRejection, TourState};
