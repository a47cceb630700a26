/// CrossClimb module - ordered path checking in `path`, the screen in `game`
pub mod game;
pub mod path;

pub use game::ClimbGame;
pub use path::{ClimbChallenge, ClimbStatus, CrossClimb};
