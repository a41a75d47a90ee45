//! Running many games to compare strategies.
//!
//! A batch draws a sample of secrets from the targets pool and plays every
//! configured strategy against each of them. Every game gets a strategy
//! built fresh from its [`StrategySpec`], so games can run on any thread.

use crate::error::StrategyError;
use crate::game::{play, play_with, GameObserver, GameOutcome};
use crate::strategy::{opening_guess, Policy, ScoringMode, StrategySpec};
use crate::word::{Pools, Word};
use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Settings of a simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    pub max_turns: usize,
    /// Number of secrets in a batch, capped at the size of the targets pool.
    pub sample_size: usize,
    /// Seed for secret selection. `None` seeds from the clock.
    pub seed: Option<u64>,
    pub parallel: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_turns: 10,
            sample_size: 500,
            seed: None,
            parallel: true,
        }
    }
}

impl SimulationConfig {
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or_default()
        })
    }
}

/// Every strategy's result against one secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub secret: Word,
    pub outcomes: Vec<(String, GameOutcome)>,
}

/// Aggregate of one strategy over a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategySummary {
    pub name: String,
    pub games: usize,
    pub solved: usize,
    pub exhausted: usize,
    pub failed: usize,
    /// Sum of turns, unsolved games counted as `max_turns`.
    pub total_turns: usize,
    /// Turns to solve -> number of solved games.
    pub distribution: BTreeMap<usize, usize>,
}

impl StrategySummary {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            games: 0,
            solved: 0,
            exhausted: 0,
            failed: 0,
            total_turns: 0,
            distribution: BTreeMap::new(),
        }
    }

    fn add(&mut self, outcome: &GameOutcome) {
        self.games += 1;
        self.total_turns += outcome.turns_used();
        match outcome {
            GameOutcome::Solved { turns } => {
                self.solved += 1;
                *self.distribution.entry(*turns).or_default() += 1;
            }
            GameOutcome::Exhausted { .. } => self.exhausted += 1,
            GameOutcome::Failed { .. } => self.failed += 1,
        }
    }

    pub fn average_turns(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_turns as f64 / self.games as f64
    }
}

/// Results of a batch, one record per secret in sample order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub seed: u64,
    pub max_turns: usize,
    pub strategy_names: Vec<String>,
    pub records: Vec<GameRecord>,
}

impl BatchReport {
    pub fn summaries(&self) -> Vec<StrategySummary> {
        let mut summaries: Vec<StrategySummary> = self
            .strategy_names
            .iter()
            .map(|name| StrategySummary::new(name))
            .collect();

        for record in &self.records {
            for (summary, (_, outcome)) in summaries.iter_mut().zip(&record.outcomes) {
                summary.add(outcome);
            }
        }
        summaries
    }

    pub fn turns_for(&self, secret: &Word, strategy: &str) -> Option<usize> {
        let record = self.records.iter().find(|r| &r.secret == secret)?;
        record
            .outcomes
            .iter()
            .find(|(name, _)| name == strategy)
            .map(|(_, outcome)| outcome.turns_used())
    }

    /// Stream every record to `sink`.
    pub fn write_to<R: ResultSink + ?Sized>(&self, sink: &mut R) -> io::Result<()> {
        sink.begin(&self.strategy_names)?;
        for record in &self.records {
            let turns: Vec<(String, usize)> = record
                .outcomes
                .iter()
                .map(|(name, outcome)| (name.clone(), outcome.turns_used()))
                .collect();
            sink.record(&record.secret, &turns)?;
        }
        sink.finish()
    }
}

/// Destination for per-secret batch rows.
pub trait ResultSink {
    fn begin(&mut self, _strategy_names: &[String]) -> io::Result<()> {
        Ok(())
    }

    fn record(&mut self, secret: &Word, turns: &[(String, usize)]) -> io::Result<()>;

    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes `word,<strategy>...` rows.
pub struct CsvSink<W: Write> {
    out: W,
}

impl<W: Write> CsvSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn csv_field(field: &str) -> String {
    if field.contains(&[',', '"', '\n'][..]) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

impl<W: Write> ResultSink for CsvSink<W> {
    fn begin(&mut self, strategy_names: &[String]) -> io::Result<()> {
        write!(self.out, "word")?;
        for name in strategy_names {
            write!(self.out, ",{}", csv_field(name))?;
        }
        writeln!(self.out)
    }

    fn record(&mut self, secret: &Word, turns: &[(String, usize)]) -> io::Result<()> {
        write!(self.out, "{}", csv_field(&secret.to_string()))?;
        for (_, n) in turns {
            write!(self.out, ",{n}")?;
        }
        writeln!(self.out)
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Plays configured strategies against secrets from the targets pool.
#[derive(Debug, Clone)]
pub struct Simulation {
    pools: Pools,
    strategies: Vec<StrategySpec>,
    config: SimulationConfig,
    seed: u64,
}

impl Simulation {
    /// Fails if a strategy cannot be built on `pools`, e.g. when its initial
    /// guess is not in the dictionary.
    pub fn new(
        pools: Pools,
        strategies: Vec<StrategySpec>,
        config: SimulationConfig,
    ) -> Result<Self, StrategyError> {
        for spec in &strategies {
            spec.build(&pools)?;
        }
        let seed = config.resolve_seed();
        info!("simulation seed: {seed}");

        Ok(Self {
            pools,
            strategies,
            config,
            seed,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn pools(&self) -> &Pools {
        &self.pools
    }

    pub fn strategies(&self) -> &[StrategySpec] {
        &self.strategies
    }

    /// Give every greedy strategy without an opening its precomputed first
    /// guess, scoring the dictionary once per mode.
    pub fn precompute_openings(&mut self) -> Result<(), StrategyError> {
        let mut openings: Vec<(ScoringMode, Word)> = Vec::new();

        for spec in &mut self.strategies {
            let Policy::Greedy { mode, initial_guess } = &mut spec.policy else {
                continue;
            };
            if initial_guess.is_some() {
                continue;
            }

            let mode = *mode;
            let word = match openings.iter().find(|(m, _)| *m == mode) {
                Some((_, word)) => word.clone(),
                None => {
                    let started = Instant::now();
                    let word = opening_guess(&self.pools, mode)?;
                    info!("{mode} opening is {word} (took {:.2?})", started.elapsed());
                    openings.push((mode, word.clone()));
                    word
                }
            };
            *initial_guess = Some(word);
        }
        Ok(())
    }

    fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }

    /// One secret for a demonstration game.
    pub fn random_secret(&self) -> Option<Word> {
        self.pools.targets().words().choose(&mut self.rng()).cloned()
    }

    /// `sample_size` distinct secrets, the same for the same seed.
    pub fn sample_secrets(&self) -> Vec<Word> {
        self.pools
            .targets()
            .words()
            .choose_multiple(&mut self.rng(), self.config.sample_size)
            .cloned()
            .collect()
    }

    /// Play every strategy once against `secret`, reporting to the observer
    /// `observer_for` returns for each strategy name.
    pub fn run_example<F, O>(&self, secret: &Word, mut observer_for: F) -> Vec<(String, GameOutcome)>
    where
        F: FnMut(&str) -> O,
        O: GameObserver,
    {
        self.strategies
            .iter()
            .map(|spec| {
                let mut observer = observer_for(&spec.name);
                let outcome = match spec.build(&self.pools) {
                    Ok(mut strategy) => {
                        play_with(secret, strategy.as_mut(), self.config.max_turns, &mut observer)
                    }
                    Err(error) => self.failed(error),
                };
                (spec.name.clone(), outcome)
            })
            .collect()
    }

    /// Play a sampled batch.
    pub fn run_batch(&self) -> BatchReport {
        let secrets = self.sample_secrets();
        self.run_games(&secrets)
    }

    /// Play every strategy against each of `secrets`.
    pub fn run_games(&self, secrets: &[Word]) -> BatchReport {
        info!(
            "playing {} games with {} strategies ({})",
            secrets.len(),
            self.strategies.len(),
            if self.config.parallel { "parallel" } else { "serial" }
        );
        let started = Instant::now();

        let records: Vec<GameRecord> = if self.config.parallel {
            secrets.par_iter().map(|secret| self.play_all(secret)).collect()
        } else {
            secrets.iter().map(|secret| self.play_all(secret)).collect()
        };

        info!("batch finished in {:.2?}", started.elapsed());
        BatchReport {
            seed: self.seed,
            max_turns: self.config.max_turns,
            strategy_names: self.strategies.iter().map(|s| s.name.clone()).collect(),
            records,
        }
    }

    fn play_all(&self, secret: &Word) -> GameRecord {
        let outcomes = self
            .strategies
            .iter()
            .map(|spec| {
                let outcome = match spec.build(&self.pools) {
                    Ok(mut strategy) => play(secret, strategy.as_mut(), self.config.max_turns),
                    Err(error) => self.failed(error),
                };
                (spec.name.clone(), outcome)
            })
            .collect();

        GameRecord {
            secret: secret.clone(),
            outcomes,
        }
    }

    fn failed(&self, error: StrategyError) -> GameOutcome {
        GameOutcome::Failed {
            max_turns: self.config.max_turns,
            error,
        }
    }
}
