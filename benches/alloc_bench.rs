//! Criterion benchmarks for suite-alloc.
//!
//! Uses synthetic populations with four preference dimensions to measure
//! scoring, a single matching round and full optimizer runs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use suite_alloc::allocation::{AllocationConfig, AllocationOptimizer, SuiteRound};
use suite_alloc::model::{Agent, AgentId, GroupSlot, Population, Sex};
use suite_alloc::random::create_rng;
use suite_alloc::scoring::{Dimension, PreferenceWeights, Scorer, ScoringConfig};

const COUNTRIES: [&str; 6] = ["Singapore", "India", "China", "Vietnam", "Japan", "Kenya"];

fn dimensions() -> Vec<Dimension> {
    vec![
        Dimension::with_size("sleep", 4),
        Dimension::with_size("suite", 3),
        Dimension::with_size("cleanliness", 5),
        Dimension::with_size("alcohol", 2),
    ]
}

fn scorer() -> Scorer {
    let weights = PreferenceWeights::new()
        .with("sleep", 0.2)
        .with("suite", 0.4)
        .with("cleanliness", 0.2)
        .with("alcohol", 0.2);
    Scorer::new(ScoringConfig::default().with_weights(weights), &dimensions(), 6)
        .expect("valid scorer")
}

fn population(n: usize, seed: u64) -> Population {
    let mut rng = create_rng(seed);
    let dims = dimensions();
    let agents = (0..n)
        .map(|i| {
            let country = COUNTRIES[rng.random_range(0..COUNTRIES.len())];
            let mut agent = Agent::new(
                format!("A{i:04}"),
                Sex::Female,
                format!("School {}", rng.random_range(0..20)),
                [country],
                "Singapore",
            );
            for d in &dims {
                agent = agent.with_preference(d.name(), rng.random_range(0..d.len() as u32));
            }
            agent
        })
        .collect();
    Population::new("bench", agents)
}

fn bench_group_fitness(c: &mut Criterion) {
    let scorer = scorer();
    let pop = population(6, 1);
    let members = pop.resolve(&pop.ids().collect::<Vec<_>>());
    c.bench_function("group_fitness", |b| {
        b.iter(|| black_box(scorer.group_fitness(black_box(&members))))
    });
}

fn bench_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("suite_round");
    group.sample_size(20);

    let scorer = scorer();
    for &groups in &[10usize, 40] {
        let pop = population(groups * 2, 2);
        let mut slots: Vec<GroupSlot> =
            (0..groups).map(|i| GroupSlot::new(format!("G {i}"), 6, 5)).collect();
        for (i, slot) in slots.iter_mut().enumerate() {
            assert!(slot.try_add(AgentId(i), pop.get(AgentId(i))));
        }
        let open: Vec<usize> = (0..groups).collect();
        let batch: Vec<AgentId> = (groups..groups * 2).map(AgentId).collect();

        group.bench_with_input(BenchmarkId::from_parameter(groups), &slots, |b, slots| {
            let round = SuiteRound::new(&scorer, &pop, true);
            b.iter(|| {
                let mut slots = slots.clone();
                black_box(round.run(1, &mut slots, &open, &batch).expect("round"))
            });
        });
    }
    group.finish();
}

fn bench_optimizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimizer");
    group.sample_size(10);

    let scorer = scorer();
    for &n in &[60usize, 240] {
        let pop = population(n, 3);
        let config = AllocationConfig::default()
            .with_trials(10)
            .with_seed(42)
            .with_parallel(false);
        group.bench_with_input(BenchmarkId::from_parameter(n), &pop, |b, pop| {
            b.iter(|| {
                AllocationOptimizer::run(&scorer, black_box(pop), &config)
                    .expect("allocation")
                    .best_score
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_group_fitness, bench_round, bench_optimizer);
criterion_main!(benches);
