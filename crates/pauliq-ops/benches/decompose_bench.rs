//! Benchmarks for Pauli decomposition and measurement circuits
//!
//! Run with: cargo bench -p pauliq-ops

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pauliq_ops::{
    Decomposition, MeasurementCircuitBuilder, MeasurementStrategy, PauliBasis, compose, decompose,
};

/// Dense operator with every Pauli term present.
fn full_decomposition(n: usize) -> Decomposition {
    Decomposition::from_terms(
        n,
        PauliBasis::terms(n).enumerate().map(|(i, t)| (t, 1.0 / (i + 1) as f64)),
    )
    .unwrap()
}

/// Benchmark decomposition of dense operators
fn bench_decompose(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompose");

    for num_qubits in [2, 3, 4, 5, 6] {
        let operator = compose(&full_decomposition(num_qubits)).unwrap();
        group.bench_with_input(
            BenchmarkId::new("dense", num_qubits),
            &operator,
            |b, op| {
                b.iter(|| decompose(black_box(op), 1e-12).unwrap());
            },
        );
    }

    group.finish();
}

/// Benchmark composition back to a matrix
fn bench_compose(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose");

    for num_qubits in [2, 4, 6] {
        let decomposition = full_decomposition(num_qubits);
        group.bench_with_input(
            BenchmarkId::new("dense", num_qubits),
            &decomposition,
            |b, d| {
                b.iter(|| compose(black_box(d)).unwrap());
            },
        );
    }

    group.finish();
}

/// Benchmark eigen-strategy measurement circuits
fn bench_measurement_circuits(c: &mut Criterion) {
    let mut group = c.benchmark_group("measurement_circuit");
    let builder = MeasurementCircuitBuilder::new().with_strategy(MeasurementStrategy::Eigen);

    for label in ["XY", "XYZ", "XYZXY", "XYZXYZX"] {
        let term = label.parse().unwrap();
        group.bench_with_input(BenchmarkId::new("eigen", label.len()), &term, |b, t| {
            b.iter(|| builder.measurement_circuit(black_box(t)).unwrap());
        });
    }

    group.bench_function("table_all_2q", |b| {
        let builder = MeasurementCircuitBuilder::new();
        b.iter(|| builder.all_for(black_box(2)).unwrap());
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_decompose,
    bench_compose,
    bench_measurement_circuits
);
criterion_main!(benches);
