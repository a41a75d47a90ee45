//! Feedback calculation for guesses.
//!
//! This module computes the per-position feedback (exact/misplaced/wrong)
//! for a guess against a secret word, with the usual duplicate-letter rules.

use crate::word::{Word, MAX_WORD_LENGTH};
use std::fmt;

/// Feedback for a single letter position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feedback {
    /// Letter absent, or all of its occurrences already accounted for (gray)
    Wrong,
    /// Letter present elsewhere in the secret (yellow)
    Misplaced,
    /// Letter at exactly this position (green)
    Exact,
}

impl Feedback {
    /// Convert to a character for display
    pub fn to_char(self) -> char {
        match self {
            Feedback::Exact => '🟩',
            Feedback::Misplaced => '🟨',
            Feedback::Wrong => '⬛',
        }
    }

    /// Parse from a character (g=green, y=yellow, b=black/gray)
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'g' | '2' => Some(Feedback::Exact),
            'y' | '1' => Some(Feedback::Misplaced),
            'b' | 'x' | '0' => Some(Feedback::Wrong),
            _ => None,
        }
    }

    fn value(self) -> u64 {
        match self {
            Feedback::Wrong => 0,
            Feedback::Misplaced => 1,
            Feedback::Exact => 2,
        }
    }
}

/// The feedback for a whole guess, packed into a base-3 code.
///
/// Position `i` contributes `value * 3^i`, with wrong = 0, misplaced = 1 and
/// exact = 2. The word length is kept alongside so that patterns of
/// different lengths never compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeedbackPattern {
    code: u64,
    len: u8,
}

impl FeedbackPattern {
    /// Create a pattern from individual feedback values
    pub fn new(feedbacks: &[Feedback]) -> Self {
        debug_assert!(feedbacks.len() <= MAX_WORD_LENGTH);
        let mut code = 0u64;
        let mut multiplier = 1u64;
        for fb in feedbacks {
            code += fb.value() * multiplier;
            multiplier = multiplier.wrapping_mul(3);
        }
        Self {
            code,
            len: feedbacks.len() as u8,
        }
    }

    /// The winning pattern for words of length `len`.
    pub fn all_exact(len: usize) -> Self {
        debug_assert!(len <= MAX_WORD_LENGTH);
        // sum of 2 * 3^i over all positions
        Self {
            code: 3u64.pow(len as u32) - 1,
            len: len as u8,
        }
    }

    /// Calculate the feedback pattern for `guess` against `secret`.
    ///
    /// Exact matches are claimed first. Each remaining guess position then
    /// claims the leftmost unconsumed secret position holding the same
    /// letter, so a secret letter is matched at most once and earlier guess
    /// positions win over later ones.
    pub fn calculate(guess: &Word, secret: &Word) -> Self {
        let guess = guess.chars();
        let secret = secret.chars();
        debug_assert_eq!(guess.len(), secret.len());
        debug_assert!(guess.len() <= MAX_WORD_LENGTH);

        let len = guess.len();
        let mut feedback = [Feedback::Wrong; MAX_WORD_LENGTH];
        let mut consumed = [false; MAX_WORD_LENGTH];

        for i in 0..len {
            if guess[i] == secret[i] {
                feedback[i] = Feedback::Exact;
                consumed[i] = true;
            }
        }

        for i in 0..len {
            if feedback[i] == Feedback::Exact {
                continue;
            }
            if let Some(j) = (0..len).find(|&j| !consumed[j] && secret[j] == guess[i]) {
                feedback[i] = Feedback::Misplaced;
                consumed[j] = true;
            }
        }

        Self::new(&feedback[..len])
    }

    pub fn len(self) -> usize {
        self.len as usize
    }

    pub fn is_empty(self) -> bool {
        self.len == 0
    }

    /// The packed base-3 code.
    pub fn code(self) -> u64 {
        self.code
    }

    /// Convert pattern to a vector of feedbacks
    pub fn to_feedbacks(self) -> Vec<Feedback> {
        let mut code = self.code;
        (0..self.len)
            .map(|_| {
                let fb = match code % 3 {
                    0 => Feedback::Wrong,
                    1 => Feedback::Misplaced,
                    _ => Feedback::Exact,
                };
                code /= 3;
                fb
            })
            .collect()
    }

    /// Check if this pattern represents a win (all exact)
    pub fn is_win(self) -> bool {
        self == Self::all_exact(self.len())
    }

    /// Parse a pattern from a string like "gybbb" or "21000"
    pub fn parse(s: &str) -> Option<Self> {
        let feedbacks: Vec<Feedback> = s.chars().map(Feedback::from_char).collect::<Option<_>>()?;
        if feedbacks.is_empty() || feedbacks.len() > MAX_WORD_LENGTH {
            return None;
        }
        Some(Self::new(&feedbacks))
    }

    /// Display as emoji string
    pub fn to_emoji_string(self) -> String {
        self.to_feedbacks().iter().map(|f| f.to_char()).collect()
    }
}

impl fmt::Display for FeedbackPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_emoji_string())
    }
}

/// True iff every position of `feedback` is exact.
pub fn is_win(feedback: FeedbackPattern) -> bool {
    feedback.is_win()
}
