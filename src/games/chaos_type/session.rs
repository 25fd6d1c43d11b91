//! Session state machine: spawning, per-word expiry, lives and the speed ramp.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::core::timers::{Fired, TimerRegistry};
use crate::games::chaos_type::difficulty::Difficulty;
use crate::games::chaos_type::words::WordSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WordId(u64);

impl WordId {
    #[cfg(test)]
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Start,
    Running,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    pub phase: Phase,
    pub lives: u32,
    pub word_count: u32,
    pub spawn_interval_ms: u64,
    pub level: u32,
}

impl GameSession {
    fn initial(config: &GameConfig) -> Self {
        Self {
            phase: Phase::Start,
            lives: config.lives,
            word_count: 0,
            spawn_interval_ms: config.spawn_interval_ms,
            level: 1,
        }
    }
}

/// A word on screen. Its pending expiry lives in the engine's timer registry under `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveWord {
    pub id: WordId,
    pub text: String,
    /// Horizontal position, percent of the play field
    pub x: f32,
    /// Vertical position, percent of the play field
    pub y: f32,
    pub spawned_at_ms: u64,
    pub expires_at_ms: u64,
}

/// Read-only view handed to the renderer every frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub lives: u32,
    pub word_count: u32,
    pub spawn_interval_ms: u64,
    pub level: u32,
    pub words: Vec<ActiveWord>,
    pub now_ms: u64,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalScore {
    pub level: u32,
    pub word_count: u32,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    GameOver(FinalScore),
}

pub struct DifficultyEngine<W> {
    config: GameConfig,
    session: GameSession,
    words: Vec<ActiveWord>,
    timers: TimerRegistry<WordId>,
    source: W,
    rng: StdRng,
    next_id: u64,
    running_since_ms: u64,
    elapsed_ms: u64,
    events: Vec<SessionEvent>,
}

impl<W: WordSource> DifficultyEngine<W> {
    pub fn new(config: GameConfig, source: W) -> Self {
        Self::with_rng(config, source, StdRng::from_os_rng())
    }

    pub fn with_rng(config: GameConfig, source: W, rng: StdRng) -> Self {
        Self {
            session: GameSession::initial(&config),
            config,
            words: Vec::new(),
            timers: TimerRegistry::new(),
            source,
            rng,
            next_id: 0,
            running_since_ms: 0,
            elapsed_ms: 0,
            events: Vec::new(),
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    pub fn words(&self) -> &[ActiveWord] {
        &self.words
    }

    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    /// Number of expiry timers still outstanding.
    pub fn pending_expiries(&self) -> usize {
        self.timers.pending()
    }

    /// Current spawn period, or `None` while the spawner is stopped.
    pub fn spawner_period(&self) -> Option<u64> {
        self.timers.interval_period()
    }

    pub fn elapsed_ms(&self) -> u64 {
        match self.session.phase {
            Phase::Running => self.now_ms() - self.running_since_ms,
            _ => self.elapsed_ms,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.session.phase,
            lives: self.session.lives,
            word_count: self.session.word_count,
            spawn_interval_ms: self.session.spawn_interval_ms,
            level: self.session.level,
            words: self.words.clone(),
            now_ms: self.now_ms(),
            elapsed_ms: self.elapsed_ms(),
        }
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Start -> Running with whatever the session currently holds.
    pub fn start(&mut self) -> bool {
        if self.session.phase != Phase::Start {
            return false;
        }
        self.enter_running();
        true
    }

    /// End -> Running with a fresh session.
    pub fn restart(&mut self) -> bool {
        if self.session.phase != Phase::End {
            return false;
        }
        let leftover = self.timers.cancel_all();
        if leftover > 0 {
            debug!(leftover, "cancelled leftover expiry timers on restart");
        }
        self.words.clear();
        self.session = GameSession::initial(&self.config);
        self.enter_running();
        true
    }

    fn enter_running(&mut self) {
        self.session.phase = Phase::Running;
        self.running_since_ms = self.now_ms();
        self.elapsed_ms = 0;
        self.timers.start_interval(self.session.spawn_interval_ms);
        info!(
            lives = self.session.lives,
            spawn_interval_ms = self.session.spawn_interval_ms,
            "session running"
        );
        if self.session.lives == 0 {
            self.end_game();
        }
    }

    /// Moves the clock forward by `dt_ms`, running every spawn and expiry that
    /// comes due in between, one at a time and in deadline order.
    pub fn advance(&mut self, dt_ms: u64) {
        let until = self.now_ms() + dt_ms;
        while let Some(fired) = self.timers.pop_due(until) {
            match fired {
                Fired::Interval => self.spawn(),
                Fired::Timeout(id) => self.on_word_expired(id),
            }
        }
        self.timers.settle(until);
    }

    fn spawn(&mut self) {
        if self.session.phase != Phase::Running {
            return;
        }
        let id = WordId(self.next_id);
        self.next_id += 1;

        let now = self.now_ms();
        let word = ActiveWord {
            id,
            text: self.source.generate(),
            x: self.rng.random_range(0.0..100.0),
            y: self.rng.random_range(0.0..100.0),
            spawned_at_ms: now,
            expires_at_ms: now + self.config.word_expiry_ms,
        };
        self.timers.schedule(id, self.config.word_expiry_ms);
        debug!(?id, text = %word.text, "spawned word");
        self.words.push(word);
    }

    /// Removes the word and its expiry timer. Every removal goes through here.
    fn remove_word(&mut self, id: WordId) -> Option<ActiveWord> {
        self.timers.cancel(id);
        let idx = self.words.iter().position(|w| w.id == id)?;
        Some(self.words.remove(idx))
    }

    fn on_word_expired(&mut self, id: WordId) {
        let Some(word) = self.remove_word(id) else {
            return;
        };
        self.session.lives = self.session.lives.saturating_sub(1);
        debug!(?id, text = %word.text, lives = self.session.lives, "word expired");

        if self.session.lives == 0 && self.session.phase == Phase::Running {
            self.end_game();
        }
    }

    fn end_game(&mut self) {
        self.elapsed_ms = self.now_ms() - self.running_since_ms;
        self.session.phase = Phase::End;
        self.timers.stop_interval();
        let cancelled = self.timers.cancel_all();
        self.words.clear();

        let score = FinalScore {
            level: self.session.level,
            word_count: self.session.word_count,
            elapsed_ms: self.elapsed_ms,
        };
        info!(
            level = score.level,
            word_count = score.word_count,
            elapsed_ms = score.elapsed_ms,
            cancelled,
            "game over"
        );
        self.events.push(SessionEvent::GameOver(score));
    }

    /// Credits the player for `id`. Unknown ids (already expired or completed) are ignored.
    pub fn complete_word(&mut self, id: WordId) -> bool {
        if self.session.phase != Phase::Running {
            return false;
        }
        let Some(word) = self.remove_word(id) else {
            return false;
        };
        self.session.word_count += 1;
        debug!(?id, text = %word.text, word_count = self.session.word_count, "word completed");
        self.apply_ramp();
        true
    }

    /// Completes the oldest active word whose text is exactly `typed`.
    pub fn submit(&mut self, typed: &str) -> Option<WordId> {
        let id = self.words.iter().find(|w| w.text == typed)?.id;
        self.complete_word(id).then_some(id)
    }

    fn apply_ramp(&mut self) {
        let mut difficulty = Difficulty {
            spawn_interval_ms: self.session.spawn_interval_ms,
            level: self.session.level,
        };
        if difficulty.on_word_count(self.session.word_count) {
            self.session.spawn_interval_ms = difficulty.spawn_interval_ms;
            self.session.level = difficulty.level;
            self.reconfigure_spawner();
        }
    }

    /// Tears the spawner down and restarts it at the current interval.
    fn reconfigure_spawner(&mut self) {
        if self.session.phase != Phase::Running {
            return;
        }
        self.timers.start_interval(self.session.spawn_interval_ms);
        info!(
            spawn_interval_ms = self.session.spawn_interval_ms,
            level = self.session.level,
            "speed up"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::chaos_type::words::FixedWords;

    fn engine(words: &[&str]) -> DifficultyEngine<FixedWords> {
        DifficultyEngine::with_rng(
            GameConfig::default(),
            FixedWords::new(words.iter().copied()),
            StdRng::seed_from_u64(1),
        )
    }

    #[test]
    fn nothing_spawns_before_start() {
        let mut e = engine(&["a"]);
        e.advance(10_000);
        assert_eq!(e.phase(), Phase::Start);
        assert!(e.words().is_empty());
        assert_eq!(e.spawner_period(), None);
    }

    #[test]
    fn start_only_leaves_start_phase() {
        let mut e = engine(&["a"]);
        assert!(e.start());
        assert!(!e.start());
        assert!(!e.restart());
        assert_eq!(e.phase(), Phase::Running);
        assert_eq!(e.spawner_period(), Some(2000));
    }

    #[test]
    fn each_spawn_tick_adds_one_word_with_one_expiry() {
        let mut e = engine(&["alpha", "beta", "gamma"]);
        e.start();
        for n in 1..=6 {
            e.advance(2000);
            assert_eq!(e.words().len(), n);
            assert_eq!(e.pending_expiries(), n);
        }
        let w = &e.words()[0];
        assert_eq!(w.text, "alpha");
        assert_eq!(w.spawned_at_ms, 2000);
        assert_eq!(w.expires_at_ms, 14_000);
        assert!((0.0..100.0).contains(&w.x));
        assert!((0.0..100.0).contains(&w.y));
    }

    #[test]
    fn completing_a_word_credits_without_touching_lives() {
        let mut e = engine(&["alpha", "beta"]);
        e.start();
        e.advance(4000);
        let id = e.submit("beta").unwrap();
        assert_eq!(e.session().word_count, 1);
        assert_eq!(e.session().lives, 3);
        assert_eq!(e.words().len(), 1);
        assert_eq!(e.words()[0].text, "alpha");
        assert_eq!(e.pending_expiries(), 1);

        // completing the same id again is a no-op
        assert!(!e.complete_word(id));
        assert_eq!(e.session().word_count, 1);
    }

    #[test]
    fn submit_ignores_partial_and_unknown_text() {
        let mut e = engine(&["alpha"]);
        e.start();
        e.advance(2000);
        assert_eq!(e.submit("alph"), None);
        assert_eq!(e.submit("Alpha"), None);
        assert_eq!(e.submit("zeta"), None);
        assert_eq!(e.words().len(), 1);
    }

    #[test]
    fn completed_word_never_expires() {
        let mut e = engine(&["alpha"]);
        e.start();
        e.advance(2000);
        e.submit("alpha").unwrap();
        e.advance(12_000);
        assert_eq!(e.session().lives, 3);
    }

    #[test]
    fn expiry_costs_one_life_and_keeps_word_count() {
        let mut e = engine(&["alpha", "beta"]);
        e.start();
        e.advance(4000);
        e.submit("beta");
        // alpha spawned at 2000 and expires at 14000
        e.advance(10_000);
        assert_eq!(e.session().lives, 2);
        assert_eq!(e.session().word_count, 1);
        assert!(e.words().iter().all(|w| w.text != "alpha" || w.spawned_at_ms != 2000));
    }

    #[test]
    fn three_expiries_end_the_game() {
        let mut e = engine(&["alpha"]);
        e.start();
        e.advance(14_000);
        assert_eq!(e.session().lives, 2);
        e.advance(2000);
        assert_eq!(e.session().lives, 1);
        e.advance(2000);

        assert_eq!(e.session().lives, 0);
        assert_eq!(e.phase(), Phase::End);
        assert!(e.words().is_empty());
        assert_eq!(e.pending_expiries(), 0);
        assert_eq!(e.spawner_period(), None);

        let events = e.drain_events();
        assert_eq!(
            events,
            vec![SessionEvent::GameOver(FinalScore { level: 1, word_count: 0, elapsed_ms: 18_000 })]
        );

        // nothing happens after the end
        e.advance(60_000);
        assert_eq!(e.session().lives, 0);
        assert!(e.words().is_empty());
        assert!(e.drain_events().is_empty());
        assert_eq!(e.elapsed_ms(), 18_000);
    }

    #[test]
    fn zero_starting_lives_ends_immediately() {
        let config = GameConfig { lives: 0, ..GameConfig::default() };
        let mut e = DifficultyEngine::with_rng(config, FixedWords::new(["a"]), StdRng::seed_from_u64(1));
        assert!(e.start());
        assert_eq!(e.phase(), Phase::End);
        assert_eq!(e.spawner_period(), None);
        assert_eq!(
            e.drain_events(),
            vec![SessionEvent::GameOver(FinalScore { level: 1, word_count: 0, elapsed_ms: 0 })]
        );
        e.advance(60_000);
        assert!(e.words().is_empty());
        assert_eq!(e.pending_expiries(), 0);
    }

    #[test]
    fn no_completion_after_game_end() {
        let mut e = engine(&["alpha"]);
        e.start();
        e.advance(18_000);
        assert_eq!(e.phase(), Phase::End);
        assert_eq!(e.submit("alpha"), None);
        assert_eq!(e.session().word_count, 0);
    }

    #[test]
    fn fifth_word_speeds_up_spawner() {
        let mut e = engine(&["a", "b", "c", "d", "e"]);
        e.start();
        e.advance(10_000);
        for text in ["a", "b", "c", "d"] {
            e.submit(text).unwrap();
        }
        assert_eq!(e.spawner_period(), Some(2000));
        e.submit("e").unwrap();
        assert_eq!(e.session().spawn_interval_ms, 1900);
        assert_eq!(e.session().level, 2);
        assert_eq!(e.spawner_period(), Some(1900));

        // the new period counts from the reconfiguration, not from the old grid
        e.advance(1899);
        assert!(e.words().is_empty());
        e.advance(1);
        assert_eq!(e.words().len(), 1);
    }

    #[test]
    fn restart_resets_everything() {
        let mut e = engine(&["a", "b", "c", "d", "e"]);
        e.start();
        e.advance(10_000);
        for text in ["a", "b", "c", "d", "e"] {
            e.submit(text);
        }
        e.advance(60_000);
        assert_eq!(e.phase(), Phase::End);
        e.drain_events();

        assert!(e.restart());
        assert_eq!(
            e.session(),
            &GameSession {
                phase: Phase::Running,
                lives: 3,
                word_count: 0,
                spawn_interval_ms: 2000,
                level: 1,
            }
        );
        assert!(e.words().is_empty());
        assert_eq!(e.pending_expiries(), 0);
        assert_eq!(e.spawner_period(), Some(2000));
        assert_eq!(e.elapsed_ms(), 0);
    }

    #[test]
    fn ids_stay_unique_across_restart() {
        let mut e = engine(&["a"]);
        e.start();
        e.advance(2000);
        let first = e.words()[0].id;
        e.advance(20_000);
        e.restart();
        e.advance(2000);
        assert_ne!(e.words()[0].id, first);
    }

    #[test]
    fn snapshot_mirrors_state() {
        let mut e = engine(&["alpha"]);
        e.start();
        e.advance(2500);
        let snap = e.snapshot();
        assert_eq!(snap.phase, Phase::Running);
        assert_eq!(snap.lives, 3);
        assert_eq!(snap.level, 1);
        assert_eq!(snap.spawn_interval_ms, 2000);
        assert_eq!(snap.words.len(), 1);
        assert_eq!(snap.now_ms, 2500);
        assert_eq!(snap.elapsed_ms, 2500);
    }
}
