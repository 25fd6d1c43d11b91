/// Core game interface for the chaostype runtime
use std::time::Duration;

use crossterm::event::KeyEvent;
use tokio::sync::mpsc::UnboundedSender;

/// Handle a game uses to push events out to the runtime (score recording, etc.)
pub struct Context<E> {
    pub tx: UnboundedSender<E>,
}

impl<E> Context<E> {
    pub fn emit(&self, event: E) {
        // the receiver only goes away once the run loop has exited
        let _ = self.tx.send(event);
    }
}

/// Main game trait. The engine owns the loop and calls into the game for
/// ticks, keystrokes and frames.
pub trait Game {
    /// Events the game hands back to the runtime
    type Event: Send + 'static;

    /// How often `on_tick` should run. `None` means the game is purely input driven.
    fn tick_rate(&self) -> Option<Duration>;

    /// Heartbeat. `dt` is the wall-clock time since the previous tick, in milliseconds.
    fn on_tick(&mut self, dt: u32, ctx: &Context<Self::Event>);

    fn handle_input(&mut self, key: KeyEvent, ctx: &Context<Self::Event>);

    fn render(&self, frame: &mut ratatui::Frame);
}
