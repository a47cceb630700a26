/// Macro to register games in the registry with automatic launcher generation
///
/// Usage in games/mod.rs:
/// ```ignore
/// register_games! {
///     climb => {
///         build: ClimbGame::for_difficulty,
///         id: "climb",
///         name: "CrossClimb",
///         description: "Climb the mountain one cell at a time",
///         author: "Puzzterm Team"
///     }
/// }
/// ```
#[macro_export]
macro_rules! register_games {
    (
        $(
            $module:ident => {
                build: $game:ident :: $ctor:ident,
                id: $id:expr,
                name: $name:expr,
                description: $desc:expr,
                author: $author:expr
            }
        ),* $(,)?
    ) => {
        /// Get all available games with their metadata and launchers
        pub fn get_all_games() -> Vec<GameEntry> {
            vec![
                $(
                    GameEntry {
                        info: GameInfo {
                            id: $id,
                            name: $name,
                            description: $desc,
                            author: $author,
                        },
                        launcher: |difficulty: $crate::core::game::Difficulty| {
                            use $crate::games::$module::$game;
                            Box::new($game::$ctor(difficulty)) as Box<dyn $crate::core::game::PuzzleGame>
                        },
                    }
                ),*
            ]
        }

        /// Get a game by ID
        pub fn get_game(id: &str) -> Option<GameEntry> {
            get_all_games().into_iter().find(|g| g.info.id == id)
        }
    };
}
