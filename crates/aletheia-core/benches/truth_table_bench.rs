//! # Truth Table Benchmarks
//!
//! Performance benchmarks for truth-table enumeration and tautology checks.
//!
//! Run with: `cargo bench -p aletheia-core`

use aletheia_core::TruthTableEngine;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

/// Engine with `n` variables and a chain-of-implications expression.
fn create_engine(n: usize) -> TruthTableEngine {
    let mut engine = TruthTableEngine::new();
    for i in 0..n {
        engine.add_variable(&format!("V{i}")).expect("variable");
    }
    engine.add_expression(&chain(n)).expect("expression");
    engine
}

/// `(V0 implication V1) and (V1 implication V2) and ...`
fn chain(n: usize) -> String {
    if n < 2 {
        return "V0 or not V0".to_string();
    }
    (0..n - 1)
        .map(|i| format!("(V{} implication V{})", i, i + 1))
        .collect::<Vec<_>>()
        .join(" and ")
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_generate_truth_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_truth_table");

    for size in [4, 8, 12] {
        let engine = create_engine(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &engine, |b, engine| {
            b.iter(|| black_box(engine.generate_truth_table()));
        });
    }

    group.finish();
}

fn bench_tautology(c: &mut Criterion) {
    let mut group = c.benchmark_group("tautology");

    for size in [4, 8, 12] {
        let engine = create_engine(size);
        let expression = format!("(V0 and V1) implication V0 or V{}", size - 1);
        group.bench_with_input(
            BenchmarkId::from_parameter(size),
            &expression,
            |b, expression| {
                b.iter(|| black_box(engine.tautology(black_box(expression))));
            },
        );
    }

    group.finish();
}

fn bench_natural_language_rejection(c: &mut Criterion) {
    let engine = create_engine(8);
    c.bench_function("tautology_rejects_text", |b| {
        b.iter(|| black_box(engine.tautology(black_box("socrates is mortal"))));
    });
}

criterion_group!(
    benches,
    bench_generate_truth_table,
    bench_tautology,
    bench_natural_language_rejection
);
criterion_main!(benches);
