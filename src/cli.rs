use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::GameConfig;
use crate::core::engine::Engine;
use crate::core::leaderboard::Leaderboard;
use crate::games::chaos_type::{ChaosTypeGame, DifficultyEngine, RandomWords, SessionEvent};
use crate::scores::{JsonScoreStore, ScoreRecorder, ScoreStore};

#[derive(Parser)]
#[command(name = "chaostype")]
#[command(about = "⌨️  Type the words before they vanish")]
#[command(version)]
pub struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// High score file (overrides the config file)
    #[arg(long, global = true)]
    pub scores: Option<PathBuf>,

    /// Write logs here. Without it nothing is logged so the screen stays clean.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Play a game (default)
    Play {
        /// Name stored with your score
        #[arg(short, long, default_value = "player")]
        name: String,
    },
    /// Show the leaderboard
    Scores,
}

/// Installs the fmt subscriber writing to `path`. `RUST_LOG` picks the level, `info` otherwise.
pub fn init_tracing(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_tracing(path)?;
    }

    let mut config = GameConfig::load(cli.config.as_deref())?;
    if let Some(scores) = cli.scores {
        config.scores_path = scores;
    }

    match cli.command {
        Some(Commands::Play { name }) => play(config, name).await,
        Some(Commands::Scores) => show_scores(&config),
        None => play(config, "player".to_string()).await,
    }
}

async fn play(config: GameConfig, name: String) -> Result<()> {
    info!(player = %name, scores = %config.scores_path.display(), "starting game");
    let store = JsonScoreStore::new(&config.scores_path, config.max_scores);
    let mut recorder = ScoreRecorder::new(name, store);

    let tick = Duration::from_millis(config.tick_ms.max(1));
    let engine = DifficultyEngine::new(config, RandomWords::new());
    let game = ChaosTypeGame::new(engine, tick);

    let mut terminal = ratatui::init();
    let result = Engine::new(game)
        .run(&mut terminal, |event| {
            match event {
                SessionEvent::GameOver(score) => {
                    // a failed write should not kill the session
                    if let Err(e) = recorder.record(&score) {
                        warn!(error = %e, "could not save score");
                    }
                }
            }
            Ok(())
        })
        .await;
    ratatui::restore();

    result.map(|_| ())
}

fn show_scores(config: &GameConfig) -> Result<()> {
    let store = JsonScoreStore::new(&config.scores_path, config.max_scores);
    let mut board = Leaderboard::new(store.load());

    let mut terminal = ratatui::init();
    let result = board.run(&mut terminal);
    ratatui::restore();
    result
}
