use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use tracing::debug;

use crate::core::game::{Context, Game};

/// Fallback wake-up so input keeps flowing for games without ticks.
const IDLE_POLL: Duration = Duration::from_millis(16);

pub struct Engine<G: Game> {
    game: G,
}

impl<G: Game> Engine<G> {
    pub fn new(game: G) -> Self {
        Self { game }
    }

    /// Runs until Esc. Every event the game emits is passed to `on_event`;
    /// an error there stops the loop.
    pub async fn run<F>(mut self, terminal: &mut DefaultTerminal, mut on_event: F) -> Result<G>
    where
        F: FnMut(G::Event) -> Result<()>,
    {
        let mut last_tick = Instant::now();

        let (outbox_tx, mut outbox_rx) = tokio::sync::mpsc::unbounded_channel::<G::Event>();
        let ctx = Context { tx: outbox_tx };

        loop {
            terminal.draw(|f| self.game.render(f))?;

            // INPUT (Non-blocking)
            while crossterm::event::poll(Duration::from_millis(0))? {
                if let Event::Key(key) = crossterm::event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if key.code == KeyCode::Esc {
                        debug!("esc pressed, leaving engine loop");
                        while let Ok(event) = outbox_rx.try_recv() {
                            on_event(event)?;
                        }
                        return Ok(self.game);
                    }
                    self.game.handle_input(key, &ctx);
                }
            }

            let tick_rate = self.game.tick_rate();
            let tick_fused = tokio::time::sleep(tick_rate.unwrap_or(IDLE_POLL));

            tokio::select! {
                Some(event) = outbox_rx.recv() => {
                    on_event(event)?;
                }

                _ = tick_fused => {
                    if tick_rate.is_some() {
                        let dt = last_tick.elapsed().as_millis() as u32;
                        last_tick = Instant::now();
                        self.game.on_tick(dt, &ctx);
                    }
                }
            }
        }
    }
}
