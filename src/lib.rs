//! # Wordle Sim
//!
//! Simulates solving strategies for the Wordle guessing game and compares
//! them by the number of turns they need.
//!
//! A [`Strategy`] proposes guesses, [`FeedbackPattern::calculate`] scores each
//! guess against the secret, and the strategy's [`CandidateFilter`] keeps the
//! target words that are still consistent. The [`Greedy`] strategy picks the
//! dictionary word whose feedback splits the candidates best, either by
//! entropy or by worst case. [`Simulation`] runs batches of games, in
//! parallel on the rayon pool.

pub mod candidates;
pub mod error;
pub mod feedback;
pub mod game;
pub mod simulation;
pub mod strategy;
pub mod word;

pub use candidates::{CandidateFilter, Phase};
pub use error::{PoolError, StrategyError};
pub use feedback::{is_win, Feedback, FeedbackPattern};
pub use game::{play, play_with, GameObserver, GameOutcome, History, Silent};
pub use simulation::{
    BatchReport, CsvSink, GameRecord, ResultSink, Simulation, SimulationConfig, StrategySummary,
};
pub use strategy::{
    opening_guess, FirstConsistent, Greedy, GuessScore, Policy, ScoringMode, Strategy,
    StrategySpec,
};
pub use word::{Alphabet, Pools, Word, WordPool, WordSpec, MAX_WORD_LENGTH};

/// Word length of the embedded dictionary
pub const WORD_LENGTH: usize = 5;

/// Load the embedded five-letter English dictionary
pub fn load_dictionary() -> Result<WordPool, PoolError> {
    WordPool::from_word_list(
        include_str!("../dictionary/dictionary.txt"),
        WordSpec::new(WORD_LENGTH, Alphabet::latin())?,
    )
}
