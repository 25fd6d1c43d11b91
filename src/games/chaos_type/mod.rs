/// Chaos Type: words pop up at random spots and have to be typed before they expire.
pub mod difficulty;
pub mod game;
pub mod renderer;
pub mod session;
pub mod words;

pub use game::ChaosTypeGame;
pub use session::{DifficultyEngine, Phase, SessionEvent, Snapshot};
pub use words::{FixedWords, RandomWords, WordSource};
