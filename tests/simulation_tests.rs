use std::collections::HashSet;
use wordle_sim::{
    CsvSink, GameOutcome, History, Policy, Pools, ScoringMode, Simulation, SimulationConfig,
    StrategyError, StrategySpec, Word, WordPool, WordSpec,
};

const TOY_WORDS: [&str; 24] = [
    "crane", "slate", "trace", "crate", "raise", "arise", "stare", "roast", "toast", "beast",
    "blood", "chair", "dream", "fight", "ghost", "house", "juice", "knife", "lemon", "mouse",
    "night", "pound", "quiet", "river",
];

fn w(s: &str) -> Word {
    s.parse().unwrap()
}

fn toy_pools() -> Pools {
    Pools::single(WordPool::new(TOY_WORDS, WordSpec::default()).unwrap())
}

fn config(seed: u64, sample_size: usize, parallel: bool) -> SimulationConfig {
    SimulationConfig {
        max_turns: 10,
        sample_size,
        seed: Some(seed),
        parallel,
    }
}

fn simulation(seed: u64, sample_size: usize, parallel: bool) -> Simulation {
    Simulation::new(
        toy_pools(),
        StrategySpec::defaults(),
        config(seed, sample_size, parallel),
    )
    .unwrap()
}

#[test]
fn test_default_config() {
    let config = SimulationConfig::default();
    assert_eq!(config.max_turns, 10);
    assert_eq!(config.sample_size, 500);
    assert!(config.seed.is_none());
    assert!(config.parallel);
    assert_eq!(
        SimulationConfig {
            seed: Some(7),
            ..config
        }
        .resolve_seed(),
        7
    );
}

#[test]
fn test_sample_is_drawn_without_replacement() {
    let sim = simulation(42, 10, true);
    let sample = sim.sample_secrets();
    assert_eq!(sample.len(), 10);

    let unique: HashSet<&Word> = sample.iter().collect();
    assert_eq!(unique.len(), sample.len());
    assert!(sample.iter().all(|s| sim.pools().targets().contains(s)));
}

#[test]
fn test_sample_is_capped_at_the_targets_pool() {
    let sim = simulation(1, 1000, true);
    assert_eq!(sim.sample_secrets().len(), TOY_WORDS.len());
}

#[test]
fn test_same_seed_gives_same_results() {
    let first = simulation(1234, 12, true).run_batch();
    let second = simulation(1234, 12, true).run_batch();
    assert_eq!(first, second);

    let serial = simulation(1234, 12, false).run_batch();
    assert_eq!(first.records, serial.records);
}

#[test]
fn test_random_secret_is_deterministic() {
    let secret = simulation(99, 5, true).random_secret().unwrap();
    assert_eq!(simulation(99, 5, true).random_secret().unwrap(), secret);
    assert!(toy_pools().targets().contains(&secret));
}

#[test]
fn test_batch_solves_every_toy_word() {
    let report = simulation(5, TOY_WORDS.len(), true).run_batch();
    assert_eq!(report.records.len(), TOY_WORDS.len());
    assert_eq!(report.strategy_names, vec!["simple", "greedy", "greedy_adv"]);

    for summary in report.summaries() {
        assert_eq!(summary.games, TOY_WORDS.len());
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.distribution.values().sum::<usize>(), summary.solved);
        if summary.name != "simple" {
            assert_eq!(summary.solved, TOY_WORDS.len(), "{} missed a word", summary.name);
        }
    }

    let secret = &report.records[0].secret;
    let turns = report.turns_for(secret, "greedy").unwrap();
    assert!((1..=10).contains(&turns));
    assert!(report.turns_for(secret, "nope").is_none());
}

#[test]
fn test_failed_games_do_not_stop_the_batch() {
    let sim = simulation(3, 0, true);
    let report = sim.run_games(&[w("zzzzz"), w("house")]);

    assert_eq!(report.records.len(), 2);
    for (_, outcome) in &report.records[0].outcomes {
        assert!(!outcome.is_solved());
        assert_eq!(outcome.turns_used(), 10);
    }
    assert!(report.records[1]
        .outcomes
        .iter()
        .all(|(_, outcome)| outcome.is_solved()));
}

#[test]
fn test_precomputed_openings_do_not_change_results() {
    let plain = simulation(77, 8, true).run_batch();

    let mut sim = simulation(77, 8, true);
    sim.precompute_openings().unwrap();
    for spec in sim.strategies() {
        if let Policy::Greedy { initial_guess, .. } = &spec.policy {
            assert!(initial_guess.is_some(), "{} has no opening", spec.name);
        }
    }

    assert_eq!(sim.run_batch().records, plain.records);
}

#[test]
fn test_unbuildable_strategy_is_rejected() {
    let specs =
        vec![StrategySpec::greedy("greedy", ScoringMode::Entropy).with_initial_guess(w("zzzzz"))];
    let result = Simulation::new(toy_pools(), specs, config(1, 5, true));
    assert!(matches!(result, Err(StrategyError::UnknownWord { .. })));
}

#[test]
fn test_example_game_reports_every_strategy() {
    let sim = simulation(11, 5, true);
    let secret = sim.random_secret().unwrap();

    let mut names = Vec::new();
    let outcomes = sim.run_example(&secret, |name| {
        names.push(name.to_string());
        History::default()
    });

    assert_eq!(names, vec!["simple", "greedy", "greedy_adv"]);
    assert_eq!(outcomes.len(), 3);
    for (name, outcome) in &outcomes {
        assert!(!matches!(outcome, GameOutcome::Failed { .. }));
        if name != "simple" {
            assert!(outcome.is_solved(), "{name} missed {secret}");
        }
    }
}

#[test]
fn test_csv_output() {
    let sim = simulation(8, 0, false);
    let report = sim.run_games(&[w("crane"), w("ghost")]);

    let mut sink = CsvSink::new(Vec::new());
    report.write_to(&mut sink).unwrap();
    let text = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "word,simple,greedy,greedy_adv");
    assert!(lines[1].starts_with("CRANE,"));
    assert!(lines[2].starts_with("GHOST,"));
    assert_eq!(lines[1].split(',').count(), 4);
    // simple guesses the first pool word first
    assert_eq!(lines[1].split(',').nth(1), Some("1"));
}
