use std::fs::{self, OpenOptions};
use std::io::stdout;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use crossterm::event::{DisableFocusChange, EnableFocusChange};
use crossterm::execute;
use dialoguer::{theme::ColorfulTheme, Select};
use ratatui::DefaultTerminal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::core::activity::{spawn_reporter, ActivityHandle, ActivityTimer, JsonLinesSink};
use crate::core::config::Config;
use crate::core::engine::Engine;
use crate::core::game::{Difficulty, GameEvent};
use crate::core::menu::{ArcadeMenu, MenuChoice};
use crate::core::session::SessionStore;
use crate::games::{get_all_games, GameEntry, GameInfo};

const MENU_PAGE: &str = "menu";

#[derive(Parser)]
#[command(name = "puzzterm")]
#[command(about = "🧩 Logic puzzles for the terminal")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Play a single puzzle
    Play {
        /// Game id (if not specified, will show selection)
        game: Option<String>,

        /// easy, medium or hard
        #[arg(short, long, default_value = "easy")]
        difficulty: Difficulty,
    },
    /// List available puzzles
    List,
    /// Show the signed-in account, if any
    Whoami,
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    fs::create_dir_all(&config.data_dir)?;
    init_tracing(&config)?;
    config.log_summary();

    match cli.command {
        Some(Commands::Play { game, difficulty }) => {
            let games = get_all_games();
            let id = match game {
                Some(id) => {
                    if !games.iter().any(|g| g.info.id == id) {
                        eprintln!("❌ Game '{}' not found", id);
                        eprintln!("Available games:");
                        for entry in &games {
                            eprintln!("  • {} - {}", entry.info.id, entry.info.description);
                        }
                        bail!("unknown game '{id}'");
                    }
                    id
                }
                None => select_game(&games)?,
            };
            run_arcade(&config, Some((id, difficulty))).await?;
        }

        Some(Commands::List) => {
            println!("🎮 Available puzzles:");
            println!();
            for entry in get_all_games() {
                println!("📦 {} ({})", entry.info.name, entry.info.id);
                println!("   {}", entry.info.description);
                println!();
            }
        }

        Some(Commands::Whoami) => {
            let mut store = SessionStore::open(config.session_path())?;
            let now = Utc::now();
            match store.current(now) {
                Some(session) => println!(
                    "👤 {} <{}> ({:?}), session expires {} ({}s left)",
                    session.user.name,
                    session.user.email,
                    session.user.role,
                    session.expires_at.to_rfc3339(),
                    (session.expires_at - now).num_seconds()
                ),
                None => println!("Signed out"),
            }
        }

        None => {
            // No subcommand provided - show interactive menu
            run_arcade(&config, None).await?;
        }
    }

    Ok(())
}

fn init_tracing(config: &Config) -> Result<()> {
    // The terminal belongs to ratatui, so logs go to a file in the data dir.
    let file = OpenOptions::new().create(true).append(true).open(config.log_path())?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_filter)?)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!(e))
}

fn select_game(games: &[GameEntry]) -> Result<String> {
    if games.is_empty() {
        bail!("No games available");
    }

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("🎮 Select a puzzle")
        .items(&games.iter().map(|g| format!("{} - {}", g.info.name, g.info.description)).collect::<Vec<_>>())
        .interact()?;

    Ok(games[selection].info.id.to_string())
}

/// Owns the terminal and the activity reporter for the whole interactive run.
async fn run_arcade(config: &Config, start: Option<(String, Difficulty)>) -> Result<()> {
    let sink = Arc::new(JsonLinesSink::new(config.activity_path(), config.api_base_url.as_str()));
    let activity = ActivityHandle::new(ActivityTimer::new(MENU_PAGE), sink);
    activity.start().await?;
    let reporter = spawn_reporter(activity.clone(), config.activity_flush);

    let mut terminal = ratatui::init();
    let result = match execute!(stdout(), EnableFocusChange) {
        Ok(()) => arcade_loop(&mut terminal, &activity, start).await,
        Err(e) => Err(e.into()),
    };
    if let Err(e) = execute!(stdout(), DisableFocusChange) {
        warn!(error = %e, "failed to disable focus reporting");
    }
    ratatui::restore();

    reporter.shutdown().await;
    result
}

async fn arcade_loop(
    terminal: &mut DefaultTerminal,
    activity: &ActivityHandle,
    start: Option<(String, Difficulty)>,
) -> Result<()> {
    let games = get_all_games();

    if let Some((id, difficulty)) = start {
        let entry = games
            .iter()
            .find(|g| g.info.id == id)
            .ok_or_else(|| anyhow!("Game '{}' not found in registry!", id))?;
        play(terminal, activity, entry, difficulty).await?;
        return Ok(());
    }

    let infos: Vec<GameInfo> = games.iter().map(|g| g.info.clone()).collect();
    let mut menu = ArcadeMenu::new(Difficulty::Easy);
    loop {
        activity.navigate(MENU_PAGE).await;
        match menu.run(terminal, &infos, activity).await? {
            MenuChoice::Quit => break,
            MenuChoice::Play { id, difficulty } => {
                let Some(entry) = games.iter().find(|g| g.info.id == id) else {
                    continue;
                };
                let events = play(terminal, activity, entry, difficulty).await?;
                menu.last_result = outcome_line(entry, &events);
            }
        }
    }
    Ok(())
}

async fn play(
    terminal: &mut DefaultTerminal,
    activity: &ActivityHandle,
    entry: &GameEntry,
    difficulty: Difficulty,
) -> Result<Vec<GameEvent>> {
    info!(game = entry.info.id, %difficulty, "launching");
    Engine::new(entry.launch(difficulty), activity.clone())
        .run(terminal)
        .await
}

/// Summarises the last decisive event of a finished game for the menu footer.
fn outcome_line(entry: &GameEntry, events: &[GameEvent]) -> Option<String> {
    events.iter().rev().find_map(|event| match event {
        GameEvent::Solved { score, .. } => Some(format!("✅ {} solved, {} pts", entry.info.name, score)),
        GameEvent::Failed { reason, .. } => Some(format!("❌ {}: {}", entry.info.name, reason)),
        GameEvent::Notice(_) => None,
    })
}
