//! Speed ramp applied every time the correct-word count changes.

/// The spawn interval never drops below this.
pub const MIN_SPAWN_INTERVAL_MS: u64 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Difficulty {
    pub spawn_interval_ms: u64,
    pub level: u32,
}

impl Difficulty {
    #[cfg(test)]
    pub fn new(spawn_interval_ms: u64) -> Self {
        Self {
            spawn_interval_ms,
            level: 1,
        }
    }

    /// Applies one ramp step for the new `word_count`. Returns true when the spawn
    /// interval changed, meaning the spawner has to be reconfigured.
    ///
    /// At or below 1000ms the game speeds up by 25ms every 10th word. Above it,
    /// every 5th word takes 50ms off when at or below 1500ms and 100ms off when at
    /// or below 2000ms. Anything slower than 2000ms never ramps.
    pub fn on_word_count(&mut self, word_count: u32) -> bool {
        if word_count == 0 {
            return false;
        }

        let step = if self.spawn_interval_ms <= 1000 {
            if word_count % 10 == 0 { Some(25) } else { None }
        } else if word_count % 5 == 0 {
            if self.spawn_interval_ms <= 1500 {
                Some(50)
            } else if self.spawn_interval_ms <= 2000 {
                Some(100)
            } else {
                None
            }
        } else {
            None
        };

        match step {
            Some(step) if self.spawn_interval_ms >= MIN_SPAWN_INTERVAL_MS + step => {
                self.spawn_interval_ms -= step;
                self.level += 1;
                true
            }
            _ => false,
        }
    }
}
