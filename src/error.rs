//! Error types for word pools and strategies.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a word pool.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("word length must be between 1 and {max}, got {length}")]
    InvalidLength { length: usize, max: usize },
    #[error("'{word}' has {found} letters, expected {expected}")]
    WrongLength {
        word: String,
        expected: usize,
        found: usize,
    },
    #[error("'{word}' contains '{ch}', which is not in the alphabet")]
    DisallowedChar { word: String, ch: char },
    #[error("'{word}' appears more than once")]
    Duplicate { word: String },
    #[error("word pool is empty")]
    Empty,
    #[error("failed to read word list {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by a strategy while playing a game.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StrategyError {
    #[error("no candidate words remain")]
    EmptyCandidateSet,
    #[error("the game is already over; reset the strategy first")]
    GameOver,
    #[error("'{word}' is not in the guessing dictionary")]
    UnknownWord { word: String },
}
