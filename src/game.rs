//! Playing a single game against a known secret.

use crate::error::StrategyError;
use crate::feedback::FeedbackPattern;
use crate::strategy::Strategy;
use crate::word::Word;
use log::{debug, warn};

/// How a game ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameOutcome {
    /// Guessed the secret on turn `turns` (1-based).
    Solved { turns: usize },
    /// No win within the turn budget.
    Exhausted { max_turns: usize },
    /// The strategy could not continue, usually because the secret is not
    /// among its targets.
    Failed {
        max_turns: usize,
        error: StrategyError,
    },
}

impl GameOutcome {
    /// Turns to record for this game. Unsolved games count as `max_turns`.
    pub fn turns_used(&self) -> usize {
        match *self {
            GameOutcome::Solved { turns } => turns,
            GameOutcome::Exhausted { max_turns } | GameOutcome::Failed { max_turns, .. } => {
                max_turns
            }
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, GameOutcome::Solved { .. })
    }
}

/// Receives the events of a game, for display or recording.
pub trait GameObserver {
    fn on_start(&mut self, _secret: &Word) {}

    fn on_turn(&mut self, _turn: usize, _guess: &Word, _feedback: FeedbackPattern) {}

    fn on_finish(&mut self, _outcome: &GameOutcome) {}
}

/// Ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl GameObserver for Silent {}

/// Keeps the guesses of a game in order.
#[derive(Debug, Default, Clone)]
pub struct History {
    pub secret: Option<Word>,
    pub turns: Vec<(Word, FeedbackPattern)>,
    pub outcome: Option<GameOutcome>,
}

impl GameObserver for History {
    fn on_start(&mut self, secret: &Word) {
        self.secret = Some(secret.clone());
        self.turns.clear();
        self.outcome = None;
    }

    fn on_turn(&mut self, _turn: usize, guess: &Word, feedback: FeedbackPattern) {
        self.turns.push((guess.clone(), feedback));
    }

    fn on_finish(&mut self, outcome: &GameOutcome) {
        self.outcome = Some(outcome.clone());
    }
}

/// Play one game without output.
pub fn play<S>(secret: &Word, strategy: &mut S, max_turns: usize) -> GameOutcome
where
    S: Strategy + ?Sized,
{
    play_with(secret, strategy, max_turns, &mut Silent)
}

/// Play one game, reporting every turn to `observer`.
///
/// The strategy is reset first, so the same instance can be reused for
/// consecutive games on one thread.
pub fn play_with<S, O>(
    secret: &Word,
    strategy: &mut S,
    max_turns: usize,
    observer: &mut O,
) -> GameOutcome
where
    S: Strategy + ?Sized,
    O: GameObserver + ?Sized,
{
    strategy.reset();
    observer.on_start(secret);

    let outcome = run_turns(secret, strategy, max_turns, observer);
    if let GameOutcome::Failed { error, .. } = &outcome {
        warn!("game for {secret} failed: {error}");
    }
    observer.on_finish(&outcome);
    outcome
}

fn run_turns<S, O>(secret: &Word, strategy: &mut S, max_turns: usize, observer: &mut O) -> GameOutcome
where
    S: Strategy + ?Sized,
    O: GameObserver + ?Sized,
{
    let fail = |error| GameOutcome::Failed { max_turns, error };

    for turn in 1..=max_turns {
        let guess = match strategy.guess_word() {
            Ok(guess) => guess,
            Err(error) => return fail(error),
        };
        let feedback = FeedbackPattern::calculate(&guess, secret);
        debug!(
            "turn {turn}: {guess} {feedback} ({} candidates)",
            strategy.remaining()
        );
        observer.on_turn(turn, &guess, feedback);

        if let Err(error) = strategy.process_feedback(&guess, feedback) {
            return fail(error);
        }
        if feedback.is_win() {
            return GameOutcome::Solved { turns: turn };
        }
    }

    strategy.exhaust();
    GameOutcome::Exhausted { max_turns }
}
