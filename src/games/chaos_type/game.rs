use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::game::{Context, Game};
use crate::games::chaos_type::renderer;
use crate::games::chaos_type::session::{DifficultyEngine, Phase, SessionEvent};
use crate::games::chaos_type::words::WordSource;

/// Terminal front end for the typing game: owns the input buffer and
/// forwards exact matches to the engine.
pub struct ChaosTypeGame<W> {
    engine: DifficultyEngine<W>,
    input: String,
    tick: Duration,
}

impl<W: WordSource> ChaosTypeGame<W> {
    pub fn new(engine: DifficultyEngine<W>, tick: Duration) -> Self {
        Self {
            engine,
            input: String::new(),
            tick,
        }
    }

    pub fn engine(&self) -> &DifficultyEngine<W> {
        &self.engine
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    fn try_match(&mut self) {
        if self.engine.submit(&self.input).is_some() {
            self.input.clear();
        }
    }

    fn flush_events(&mut self, ctx: &Context<SessionEvent>) {
        for event in self.engine.drain_events() {
            ctx.emit(event);
        }
    }
}

impl<W: WordSource> Game for ChaosTypeGame<W> {
    type Event = SessionEvent;

    fn tick_rate(&self) -> Option<Duration> {
        Some(self.tick)
    }

    fn on_tick(&mut self, dt: u32, ctx: &Context<Self::Event>) {
        self.engine.advance(dt as u64);
        if self.engine.phase() != Phase::Running {
            self.input.clear();
        }
        self.flush_events(ctx);
    }

    fn handle_input(&mut self, key: KeyEvent, ctx: &Context<Self::Event>) {
        match (self.engine.phase(), key.code) {
            (Phase::Start, KeyCode::Enter) => {
                self.engine.start();
            }
            (Phase::End, KeyCode::Enter) => {
                self.input.clear();
                self.engine.restart();
            }
            (Phase::Running, KeyCode::Char(c)) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.push(c);
                self.try_match();
            }
            (Phase::Running, KeyCode::Backspace) => {
                if self.input.pop().is_some() {
                    self.try_match();
                }
            }
            (Phase::Running, KeyCode::Enter) => self.input.clear(),
            _ => {}
        }
        self.flush_events(ctx);
    }

    fn render(&self, frame: &mut ratatui::Frame) {
        renderer::render(frame, &self.engine.snapshot(), &self.input);
    }
}
