//! Benchmark harness for rank table lookups
//!
//! Builds the 5-card table once, then measures scalar lookups and the cost of
//! a 6-card escalation step (six subset probes per hand).

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use snapcall_engine::builder::best_subset_rank;
use snapcall_engine::evaluator::random_hands;
use snapcall_engine::{Evaluator, EvaluatorConfig};

fn benchmark_lookup(c: &mut Criterion) {
    let evaluator = Evaluator::new(EvaluatorConfig::default()).unwrap();
    let hands = random_hands(1_000_000, 5, 12345);

    c.bench_function("table_lookup_5card", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for &mask in black_box(&hands) {
                sum += evaluator.evaluate(mask).unwrap() as u64;
            }
            black_box(sum)
        })
    });

    let sixes = random_hands(100_000, 6, 12345);
    c.bench_function("subset_max_6card", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for &mask in black_box(&sixes) {
                sum += best_subset_rank(evaluator.table(), mask).unwrap() as u64;
            }
            black_box(sum)
        })
    });
}

criterion_group!(benches, benchmark_lookup);
criterion_main!(benches);
