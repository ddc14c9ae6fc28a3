//! game_core - Core game logic for the chat mini-game engine
//!
//! This crate provides the pure, transport-agnostic building blocks used by
//! the session engine:
//! - `text` - case folding and diacritic stripping for fair comparison
//! - `score` - partial-credit scoring between an expected and a typed string
//! - `game` - the game-state variant family and its evaluate-attempt contract

pub mod game;
pub mod score;
pub mod text;

// Re-export commonly used types
pub use game::hangman::HangmanGame;
pub use game::recall::RecallGame;
pub use game::reflex::ReflexGame;
pub use game::scramble::ScrambleGame;
pub use game::{GameKind, GameState, MessageHandle, Outcome};
pub use score::score;
pub use text::{normalize, remove_diacritics};
