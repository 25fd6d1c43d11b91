pub mod core {
	pub mod engine;
	pub mod game;
	pub mod leaderboard;
	pub mod timers;
}

pub mod cli;
pub mod config;
pub mod games;
pub mod scores;

// Re-export for convenience
pub use crate::core::game::{Context, Game};
