use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wordle_sim::{
    load_dictionary, FeedbackPattern, Greedy, Pools, ScoringMode, Simulation, SimulationConfig,
    Strategy, StrategySpec, Word,
};

fn feedback(c: &mut Criterion) {
    let guess: Word = "speed".parse().unwrap();
    let secret: Word = "creep".parse().unwrap();
    c.bench_function("feedback", |b| {
        b.iter(|| FeedbackPattern::calculate(black_box(&guess), black_box(&secret)))
    });
}

fn scoring(c: &mut Criterion) {
    let pools = Pools::single(load_dictionary().unwrap());
    let mut group = c.benchmark_group("opening");
    group.sample_size(10);
    for mode in [ScoringMode::Entropy, ScoringMode::Adversarial] {
        let greedy = Greedy::new(&pools, mode);
        group.bench_function(mode.to_string(), |b| b.iter(|| greedy.guess_word().unwrap()));
    }
    group.finish();
}

fn batch(c: &mut Criterion) {
    let pools = Pools::single(load_dictionary().unwrap());
    let config = SimulationConfig {
        sample_size: 50,
        seed: Some(0),
        ..SimulationConfig::default()
    };
    let mut simulation = Simulation::new(pools, StrategySpec::defaults(), config).unwrap();
    simulation.precompute_openings().unwrap();

    let mut group = c.benchmark_group("batch");
    group.sample_size(10);
    group.bench_function("50 games", |b| b.iter(|| simulation.run_batch()));
    group.finish();
}

criterion_group!(benches, feedback, scoring, batch);
criterion_main!(benches);
