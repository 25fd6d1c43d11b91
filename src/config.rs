use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LIVES: u32 = 3;
pub const DEFAULT_SPAWN_INTERVAL_MS: u64 = 2000;
pub const WORD_EXPIRY_MS: u64 = 12_000;
pub const TICK_MS: u64 = 50;
pub const MAX_SCORES: usize = 10;
pub const SCORES_PATH: &str = "chaostype-scores.json";

/// Tunables for a session. Every field falls back to its default when missing from the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub lives: u32,
    pub spawn_interval_ms: u64,
    pub word_expiry_ms: u64,
    /// How often the clock is advanced and the screen redrawn
    pub tick_ms: u64,
    pub max_scores: usize,
    pub scores_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            lives: DEFAULT_LIVES,
            spawn_interval_ms: DEFAULT_SPAWN_INTERVAL_MS,
            word_expiry_ms: WORD_EXPIRY_MS,
            tick_ms: TICK_MS,
            max_scores: MAX_SCORES,
            scores_path: PathBuf::from(SCORES_PATH),
        }
    }
}

impl GameConfig {
    /// Reads a JSON config file, or returns the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        if config.lives == 0 {
            bail!("config {}: lives must be at least 1", path.display());
        }
        Ok(config)
    }
}
