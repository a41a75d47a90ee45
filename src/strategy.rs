//! Guessing strategies.
//!
//! Both strategies own a [`CandidateFilter`] over the targets pool. The
//! greedy one scores every word of the guessing dictionary by how it would
//! split the remaining candidates, which may favour a guess that cannot
//! itself be the answer.

use crate::candidates::{CandidateFilter, Phase};
use crate::error::StrategyError;
use crate::feedback::FeedbackPattern;
use crate::word::{Pools, Word, WordPool};
use log::debug;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Longest word for which partitions are counted in a flat `3^L` table.
const DENSE_PATTERN_LENGTH: usize = 8;

/// Something that can play a game: propose guesses and learn from feedback.
pub trait Strategy {
    fn candidates(&self) -> &CandidateFilter;

    fn candidates_mut(&mut self) -> &mut CandidateFilter;

    /// The next guess for the current candidates.
    fn guess_word(&self) -> Result<Word, StrategyError>;

    /// Start a new game with every target word as a candidate.
    fn reset(&mut self) {
        self.candidates_mut().reset();
    }

    fn process_feedback(
        &mut self,
        guess: &Word,
        feedback: FeedbackPattern,
    ) -> Result<(), StrategyError> {
        self.candidates_mut().process_feedback(guess, feedback)
    }

    /// Record that the turn budget ran out.
    fn exhaust(&mut self) {
        self.candidates_mut().exhaust();
    }

    fn phase(&self) -> Phase {
        self.candidates().phase()
    }

    fn remaining(&self) -> usize {
        self.candidates().len()
    }
}

fn ensure_playable(filter: &CandidateFilter) -> Result<(), StrategyError> {
    if filter.phase().is_over() {
        return Err(StrategyError::GameOver);
    }
    if filter.is_empty() {
        return Err(StrategyError::EmptyCandidateSet);
    }
    Ok(())
}

/// Always guesses the first remaining candidate in pool order.
#[derive(Debug, Clone)]
pub struct FirstConsistent {
    filter: CandidateFilter,
}

impl FirstConsistent {
    pub fn new(pools: &Pools) -> Self {
        Self {
            filter: CandidateFilter::new(Arc::clone(pools.targets())),
        }
    }
}

impl Strategy for FirstConsistent {
    fn candidates(&self) -> &CandidateFilter {
        &self.filter
    }

    fn candidates_mut(&mut self) -> &mut CandidateFilter {
        &mut self.filter
    }

    fn guess_word(&self) -> Result<Word, StrategyError> {
        ensure_playable(&self.filter)?;
        self.filter
            .first()
            .cloned()
            .ok_or(StrategyError::EmptyCandidateSet)
    }
}

/// How the greedy strategy rates a partition of the candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoringMode {
    /// `-Σ n·ln(n)` over bucket sizes: prefers many, even buckets.
    Entropy,
    /// `-max(n)`: minimises the worst case.
    Adversarial,
}

impl ScoringMode {
    /// Score a partition given its non-empty bucket sizes. Higher is better.
    pub fn score(self, bucket_sizes: &[u32]) -> f64 {
        match self {
            ScoringMode::Entropy => bucket_sizes
                .iter()
                .map(|&n| {
                    let n = f64::from(n);
                    -n * n.ln()
                })
                .sum(),
            ScoringMode::Adversarial => {
                -f64::from(bucket_sizes.iter().copied().max().unwrap_or(0))
            }
        }
    }
}

impl fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringMode::Entropy => write!(f, "entropy"),
            ScoringMode::Adversarial => write!(f, "adversarial"),
        }
    }
}

/// Result of analysing a potential guess
#[derive(Debug, Clone, PartialEq)]
pub struct GuessScore {
    pub word: Word,
    pub score: f64,
    /// Expected number of candidates left after this guess.
    pub expected_remaining: f64,
    /// Size of the largest bucket.
    pub worst_case: u32,
    pub is_candidate: bool,
}

/// Picks the dictionary word that best splits the remaining candidates.
#[derive(Debug, Clone)]
pub struct Greedy {
    dictionary: Arc<WordPool>,
    filter: CandidateFilter,
    mode: ScoringMode,
    initial_guess: Option<Word>,
}

impl Greedy {
    pub fn new(pools: &Pools, mode: ScoringMode) -> Self {
        Self {
            dictionary: Arc::clone(pools.dictionary()),
            filter: CandidateFilter::new(Arc::clone(pools.targets())),
            mode,
            initial_guess: None,
        }
    }

    /// Use `word` as the first guess of every game instead of scoring the
    /// whole dictionary.
    pub fn with_initial_guess(mut self, word: Word) -> Result<Self, StrategyError> {
        if !self.dictionary.contains(&word) {
            return Err(StrategyError::UnknownWord {
                word: word.to_string(),
            });
        }
        self.initial_guess = Some(word);
        Ok(self)
    }

    pub fn mode(&self) -> ScoringMode {
        self.mode
    }

    pub fn initial_guess(&self) -> Option<&Word> {
        self.initial_guess.as_ref()
    }

    pub fn dictionary(&self) -> &Arc<WordPool> {
        &self.dictionary
    }

    /// Sizes of the non-empty buckets the candidates fall into for `guess`.
    pub fn bucket_sizes(&self, guess: &Word) -> Vec<u32> {
        if guess.len() <= DENSE_PATTERN_LENGTH {
            let mut counts = vec![0u32; 3usize.pow(guess.len() as u32)];
            for answer in self.filter.words() {
                counts[FeedbackPattern::calculate(guess, answer).code() as usize] += 1;
            }
            counts.retain(|&n| n > 0);
            counts
        } else {
            let mut counts: BTreeMap<FeedbackPattern, u32> = BTreeMap::new();
            for answer in self.filter.words() {
                *counts
                    .entry(FeedbackPattern::calculate(guess, answer))
                    .or_default() += 1;
            }
            counts.into_values().collect()
        }
    }

    pub fn score_word(&self, guess: &Word) -> f64 {
        self.mode.score(&self.bucket_sizes(guess))
    }

    pub fn evaluate(&self, guess: &Word) -> GuessScore {
        let sizes = self.bucket_sizes(guess);
        let total: u32 = sizes.iter().sum();
        let expected_remaining = if total == 0 {
            0.0
        } else {
            sizes.iter().map(|&n| f64::from(n).powi(2)).sum::<f64>() / f64::from(total)
        };

        GuessScore {
            word: guess.clone(),
            score: self.mode.score(&sizes),
            expected_remaining,
            worst_case: sizes.iter().copied().max().unwrap_or(0),
            is_candidate: self.filter.contains(guess),
        }
    }

    /// The `n` best guesses for the current candidates, best first.
    pub fn ranked_guesses(&self, n: usize) -> Vec<GuessScore> {
        if self.filter.is_empty() {
            return vec![];
        }

        let mut analyses: Vec<(usize, GuessScore)> = self
            .dictionary
            .words()
            .par_iter()
            .enumerate()
            .map(|(i, word)| (i, self.evaluate(word)))
            .collect();

        analyses.sort_by(|a, b| by_score(b.0, b.1.score, a.0, a.1.score));
        analyses.truncate(n);
        analyses.into_iter().map(|(_, analysis)| analysis).collect()
    }

    fn best_guess(&self) -> Option<Word> {
        let (index, score) = self
            .dictionary
            .words()
            .par_iter()
            .enumerate()
            .map(|(i, word)| (i, self.score_word(word)))
            .max_by(|a, b| by_score(a.0, a.1, b.0, b.1))?;

        debug!(
            "{} scoring over {} candidates picked {} ({score:.3})",
            self.mode,
            self.filter.len(),
            self.dictionary.words()[index]
        );
        self.dictionary.get(index).cloned()
    }
}

/// Orders by score, then prefers the earlier dictionary index.
fn by_score(a_index: usize, a_score: f64, b_index: usize, b_score: f64) -> Ordering {
    a_score
        .total_cmp(&b_score)
        .then_with(|| b_index.cmp(&a_index))
}

impl Strategy for Greedy {
    fn candidates(&self) -> &CandidateFilter {
        &self.filter
    }

    fn candidates_mut(&mut self) -> &mut CandidateFilter {
        &mut self.filter
    }

    fn guess_word(&self) -> Result<Word, StrategyError> {
        ensure_playable(&self.filter)?;

        if self.filter.len() == 1 {
            return self
                .filter
                .first()
                .cloned()
                .ok_or(StrategyError::EmptyCandidateSet);
        }
        if self.filter.phase() == Phase::Fresh {
            if let Some(word) = &self.initial_guess {
                return Ok(word.clone());
            }
        }

        self.best_guess().ok_or(StrategyError::EmptyCandidateSet)
    }
}

/// The first guess a greedy strategy makes on `pools`. It is the same for
/// every game, so it can be computed once and passed as an initial guess.
pub fn opening_guess(pools: &Pools, mode: ScoringMode) -> Result<Word, StrategyError> {
    Greedy::new(pools, mode).guess_word()
}

/// Which strategy a [`StrategySpec`] builds.
#[derive(Debug, Clone, PartialEq)]
pub enum Policy {
    FirstConsistent,
    Greedy {
        mode: ScoringMode,
        initial_guess: Option<Word>,
    },
}

/// A named strategy configuration. A fresh strategy is built from it for
/// every game.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategySpec {
    pub name: String,
    pub policy: Policy,
}

impl StrategySpec {
    pub fn first_consistent(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            policy: Policy::FirstConsistent,
        }
    }

    pub fn greedy(name: impl Into<String>, mode: ScoringMode) -> Self {
        Self {
            name: name.into(),
            policy: Policy::Greedy {
                mode,
                initial_guess: None,
            },
        }
    }

    /// Set the precomputed opening of a greedy spec. No effect on other
    /// policies.
    pub fn with_initial_guess(mut self, word: Word) -> Self {
        if let Policy::Greedy { initial_guess, .. } = &mut self.policy {
            *initial_guess = Some(word);
        }
        self
    }

    /// `simple`, `greedy` and `greedy_adv`.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::first_consistent("simple"),
            Self::greedy("greedy", ScoringMode::Entropy),
            Self::greedy("greedy_adv", ScoringMode::Adversarial),
        ]
    }

    pub fn build(&self, pools: &Pools) -> Result<Box<dyn Strategy + Send>, StrategyError> {
        match &self.policy {
            Policy::FirstConsistent => Ok(Box::new(FirstConsistent::new(pools))),
            Policy::Greedy {
                mode,
                initial_guess,
            } => {
                let greedy = Greedy::new(pools, *mode);
                match initial_guess {
                    Some(word) => Ok(Box::new(greedy.with_initial_guess(word.clone())?)),
                    None => Ok(Box::new(greedy)),
                }
            }
        }
    }
}
