//! Wordle Sim CLI
//!
//! Command-line front end for playing and comparing solving strategies.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::ProgressBar;
use log::warn;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Duration;
use wordle_sim::{
    load_dictionary, play_with, Alphabet, CsvSink, Feedback, FeedbackPattern, GameObserver,
    GameOutcome, Greedy, Pools, ScoringMode, Simulation, SimulationConfig, StrategySpec, Word,
    WordPool, WordSpec, WORD_LENGTH,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Word list of allowed guesses. Defaults to the embedded dictionary.
    #[arg(short, long, global = true)]
    dictionary: Option<PathBuf>,

    /// Word list secrets are drawn from. Defaults to the dictionary.
    #[arg(short, long, global = true)]
    targets: Option<PathBuf>,

    /// Word length.
    #[arg(short = 'n', long, default_value_t = WORD_LENGTH, global = true)]
    length: usize,

    /// Also accept the letters Ä, Ö and Ü.
    #[arg(long, global = true)]
    accents: bool,

    /// Turns before a game counts as lost.
    #[arg(long, default_value_t = 10, global = true)]
    max_turns: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play one game per strategy against a random secret and show every guess.
    Demo {
        /// Seed for picking the secret.
        #[arg(long)]
        seed: Option<u64>,

        /// Play against this word instead of a random one.
        #[arg(long)]
        secret: Option<String>,
    },

    /// Solve a given word with one strategy.
    Solve {
        word: String,

        #[arg(short, long, value_enum, default_value = "greedy")]
        strategy: StrategyArg,
    },

    /// Play a random sample of secrets with every strategy and compare turns.
    Batch {
        /// Number of secrets to sample.
        #[arg(short, long, default_value_t = 500)]
        games: usize,

        /// Seed for sampling secrets.
        #[arg(long)]
        seed: Option<u64>,

        /// Play the games one after another.
        #[arg(long)]
        serial: bool,

        /// Write per-word turn counts to this CSV file.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Compute the greedy openings once instead of in every game.
        #[arg(long)]
        precompute: bool,
    },

    /// Show the best opening guesses.
    Opening {
        /// Minimise the worst case instead of maximising entropy.
        #[arg(long)]
        adversarial: bool,

        #[arg(long, default_value_t = 5)]
        top: usize,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum StrategyArg {
    /// First word consistent with all feedback.
    Simple,
    /// Maximise the entropy of the feedback.
    Greedy,
    /// Minimise the largest group of remaining words.
    GreedyAdv,
}

impl StrategyArg {
    fn spec(self) -> StrategySpec {
        match self {
            StrategyArg::Simple => StrategySpec::first_consistent("simple"),
            StrategyArg::Greedy => StrategySpec::greedy("greedy", ScoringMode::Entropy),
            StrategyArg::GreedyAdv => StrategySpec::greedy("greedy_adv", ScoringMode::Adversarial),
        }
    }
}

/// Prints the secret and each guess coloured by its feedback.
struct ConsoleObserver;

impl GameObserver for ConsoleObserver {
    fn on_start(&mut self, secret: &Word) {
        println!("Secret: {secret}");
    }

    fn on_turn(&mut self, turn: usize, guess: &Word, feedback: FeedbackPattern) {
        let coloured: String = guess
            .chars()
            .iter()
            .zip(feedback.to_feedbacks())
            .map(|(c, fb)| match fb {
                Feedback::Exact => format!("\x1b[92;1m{c}\x1b[0m"),
                Feedback::Misplaced => format!("\x1b[33;1m{c}\x1b[0m"),
                Feedback::Wrong => format!("\x1b[37;1m{c}\x1b[0m"),
            })
            .collect();
        println!("Guess {turn}: {coloured} → {feedback}");
    }

    fn on_finish(&mut self, outcome: &GameOutcome) {
        print_outcome(outcome);
    }
}

fn print_outcome(outcome: &GameOutcome) {
    match outcome {
        GameOutcome::Solved { turns } => println!("Solved in {turns} guesses."),
        GameOutcome::Exhausted { max_turns } => {
            println!("Failed to solve within {max_turns} guesses.")
        }
        GameOutcome::Failed { error, .. } => println!("Gave up: {error}"),
    }
}

fn load_pools(cli: &Cli) -> Result<Pools> {
    let alphabet = if cli.accents {
        Alphabet::german()
    } else {
        Alphabet::latin()
    };
    let spec = WordSpec::new(cli.length, alphabet)?;

    let dictionary = match &cli.dictionary {
        Some(path) => WordPool::from_file(path, spec.clone())
            .with_context(|| format!("loading dictionary {}", path.display()))?,
        None => {
            if cli.length != WORD_LENGTH || cli.accents {
                bail!("the embedded dictionary only has plain {WORD_LENGTH}-letter words; pass --dictionary");
            }
            load_dictionary()?
        }
    };
    println!("Loaded {} words of {} letters.", dictionary.len(), cli.length);

    match &cli.targets {
        Some(path) => {
            let targets = WordPool::from_file(path, spec)
                .with_context(|| format!("loading targets {}", path.display()))?;
            println!("Loaded {} target words.", targets.len());
            Ok(Pools::split(dictionary, targets)?)
        }
        None => Ok(Pools::single(dictionary)),
    }
}

fn run_demo(cli: &Cli, pools: Pools, seed: Option<u64>, secret: Option<&str>) -> Result<()> {
    let config = SimulationConfig {
        max_turns: cli.max_turns,
        seed,
        ..SimulationConfig::default()
    };
    let simulation = Simulation::new(pools, StrategySpec::defaults(), config)?;

    let secret = match secret {
        Some(text) => simulation.pools().targets().spec().parse_word(text)?,
        None => match simulation.random_secret() {
            Some(word) => word,
            None => bail!("no target words"),
        },
    };

    println!("Playing example game (seed {})...", simulation.seed());
    simulation.run_example(&secret, |name| {
        println!();
        println!("--- {name} ---");
        ConsoleObserver
    });
    Ok(())
}

fn run_solve(cli: &Cli, pools: Pools, word: &str, strategy: StrategyArg) -> Result<()> {
    let secret = pools.targets().spec().parse_word(word)?;
    if !pools.targets().contains(&secret) {
        warn!("{secret} is not a target word; the strategy cannot find it");
    }

    let mut strategy = strategy.spec().build(&pools)?;
    println!();
    play_with(&secret, strategy.as_mut(), cli.max_turns, &mut ConsoleObserver);
    Ok(())
}

fn run_batch(
    cli: &Cli,
    pools: Pools,
    games: usize,
    seed: Option<u64>,
    serial: bool,
    csv: Option<&PathBuf>,
    precompute: bool,
) -> Result<()> {
    let config = SimulationConfig {
        max_turns: cli.max_turns,
        sample_size: games,
        seed,
        parallel: !serial,
    };
    let mut simulation = Simulation::new(pools, StrategySpec::defaults(), config)?;
    if precompute {
        simulation.precompute_openings()?;
    }

    let spinner = ProgressBar::new_spinner();
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message("Playing games...");
    let start = std::time::Instant::now();
    let report = simulation.run_batch();
    let elapsed = start.elapsed();
    spinner.finish_and_clear();

    println!("Played {} games (seed {}).", report.records.len(), report.seed);
    println!();
    println!(
        "{:<12} {:>8} {:>8} {:>8} {:>8}",
        "Strategy", "Turns", "Average", "Solved", "Failed"
    );
    println!("{}", "-".repeat(48));
    for summary in report.summaries() {
        println!(
            "{:<12} {:>8} {:>8.3} {:>8} {:>8}",
            summary.name,
            summary.total_turns,
            summary.average_turns(),
            summary.solved,
            summary.exhausted + summary.failed
        );
        for (turns, count) in &summary.distribution {
            let bar = "█".repeat((*count * 40 / summary.games.max(1)).max(1));
            println!("  {turns:>3} guesses: {count:>5} {bar}");
        }
    }
    println!();
    println!("Time elapsed: {elapsed:.2?}");

    if let Some(path) = csv {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        let mut sink = CsvSink::new(BufWriter::new(file));
        report
            .write_to(&mut sink)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn run_opening(pools: Pools, adversarial: bool, top: usize) {
    let mode = if adversarial {
        ScoringMode::Adversarial
    } else {
        ScoringMode::Entropy
    };
    let greedy = Greedy::new(&pools, mode);

    println!();
    println!("Top {top} openings ({mode}):");
    println!(
        "{:>4} {:>8} {:>12} {:>12} {:>6} Possible?",
        "#", "Word", "Score", "Exp. Remain", "Worst"
    );
    println!("{}", "-".repeat(56));
    for (i, analysis) in greedy.ranked_guesses(top).iter().enumerate() {
        println!(
            "{:>4} {:>8} {:>12.3} {:>12.1} {:>6} {}",
            i + 1,
            analysis.word,
            analysis.score,
            analysis.expected_remaining,
            analysis.worst_case,
            if analysis.is_candidate { "✓" } else { "" }
        );
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let pools = load_pools(&cli)?;

    match &cli.command {
        Command::Demo { seed, secret } => run_demo(&cli, pools, *seed, secret.as_deref()),
        Command::Solve { word, strategy } => run_solve(&cli, pools, word, *strategy),
        Command::Batch {
            games,
            seed,
            serial,
            csv,
            precompute,
        } => run_batch(&cli, pools, *games, *seed, *serial, csv.as_ref(), *precompute),
        Command::Opening { adversarial, top } => {
            run_opening(pools, *adversarial, *top);
            Ok(())
        }
    }
}
