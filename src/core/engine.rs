use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use tracing::{debug, info};

use crate::core::activity::ActivityHandle;
use crate::core::game::{Context, GameEvent, PuzzleGame};

pub struct Engine {
    game: Box<dyn PuzzleGame>,
    activity: ActivityHandle,
}

impl Engine {
    pub fn new(game: Box<dyn PuzzleGame>, activity: ActivityHandle) -> Self {
        Self { game, activity }
    }

    /// Runs one game until Esc, returning every event it reported.
    pub async fn run(mut self, terminal: &mut DefaultTerminal) -> Result<Vec<GameEvent>> {
        let id = self.game.id();
        info!(game = id, "game started");
        self.activity.navigate(id).await;

        let mut last_tick = Instant::now();
        let mut events = Vec::new();

        // set up the outbox games report through
        let (outbox_tx, mut outbox_rx) = tokio::sync::mpsc::unbounded_channel::<GameEvent>();
        let ctx = Context::new(outbox_tx);

        loop {
            terminal.draw(|f| self.game.render(f))?;

            // INPUT (Non-blocking)
            if event::poll(Duration::from_millis(0))? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if key.code == KeyCode::Esc {
                            break;
                        }
                        self.game.handle_input(key, &ctx);
                    }
                    // Terminal focus stands in for page visibility.
                    Event::FocusLost => {
                        debug!(game = id, "focus lost");
                        self.activity.pause().await;
                    }
                    Event::FocusGained => {
                        debug!(game = id, "focus gained");
                        self.activity.resume().await;
                    }
                    _ => {}
                }
            }

            let tick_rate = self.game.tick_rate();
            let tick_sleep = tick_rate.unwrap_or(Duration::from_millis(16));

            tokio::select! {
                Some(event) = outbox_rx.recv() => {
                    info!(game = id, ?event, "game event");
                    events.push(event);
                }

                _ = tokio::time::sleep(tick_sleep) => {
                    if tick_rate.is_some() {
                        let dt = last_tick.elapsed().as_millis() as u32;
                        last_tick = Instant::now();
                        self.game.on_tick(dt, &ctx);
                    }
                }
            }
        }

        // Drain anything emitted by the final keypress.
        while let Ok(event) = outbox_rx.try_recv() {
            info!(game = id, ?event, "game event");
            events.push(event);
        }
        info!(game = id, events = events.len(), "game closed");
        Ok(events)
    }
}
