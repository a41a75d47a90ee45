//! The set of target words still consistent with the feedback of a game.

use crate::error::StrategyError;
use crate::feedback::FeedbackPattern;
use crate::word::{Word, WordPool};
use std::sync::Arc;

/// Where a strategy is in its game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Reset, no feedback seen yet.
    Fresh,
    Playing,
    /// Received an all-exact feedback.
    Won,
    /// Ran out of turns.
    Exhausted,
}

impl Phase {
    pub fn is_over(self) -> bool {
        matches!(self, Phase::Won | Phase::Exhausted)
    }
}

/// Indices into a shared targets pool of the words that survive all feedback
/// seen so far. The pool itself is never touched.
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    pool: Arc<WordPool>,
    remaining: Vec<usize>,
    phase: Phase,
}

impl CandidateFilter {
    pub fn new(pool: Arc<WordPool>) -> Self {
        let remaining = (0..pool.len()).collect();
        Self {
            pool,
            remaining,
            phase: Phase::Fresh,
        }
    }

    /// Restore every word of the pool and return to [`Phase::Fresh`].
    pub fn reset(&mut self) {
        self.remaining.clear();
        self.remaining.extend(0..self.pool.len());
        self.phase = Phase::Fresh;
    }

    /// Keep only the candidates `w` for which guessing `guess` against `w`
    /// would have produced `feedback`.
    pub fn process_feedback(
        &mut self,
        guess: &Word,
        feedback: FeedbackPattern,
    ) -> Result<(), StrategyError> {
        if self.phase.is_over() {
            return Err(StrategyError::GameOver);
        }

        let pool = &self.pool;
        self.remaining
            .retain(|&i| FeedbackPattern::calculate(guess, &pool.words()[i]) == feedback);

        self.phase = if feedback.is_win() {
            Phase::Won
        } else {
            Phase::Playing
        };
        Ok(())
    }

    /// Mark the game as lost on turns.
    pub fn exhaust(&mut self) {
        self.phase = Phase::Exhausted;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pool(&self) -> &Arc<WordPool> {
        &self.pool
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    /// The first remaining candidate in pool order.
    pub fn first(&self) -> Option<&Word> {
        self.remaining.first().map(|&i| &self.pool.words()[i])
    }

    pub fn words(&self) -> impl Iterator<Item = &Word> + '_ {
        self.remaining.iter().map(move |&i| &self.pool.words()[i])
    }

    pub fn contains(&self, word: &Word) -> bool {
        self.words().any(|w| w == word)
    }
}
