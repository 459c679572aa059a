//! Benchmark missing value profiling, row pruning and imputation
//!
//! Run with: cargo bench --bench profile_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use polars::prelude::*;
use rand::prelude::*;
use rand::SeedableRng;

use nullsweep::pipeline::{
    drop_rows_with_missing_count_above, impute_mean, impute_mode, row_missing_counts,
    MissingProfile,
};

/// Generate numeric columns with roughly `null_rate` of cells missing.
/// Odd columns hold small integer counts so mode imputation has repeats.
fn generate_test_dataframe(n_rows: usize, n_features: usize, null_rate: f64, seed: u64) -> DataFrame {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    let columns: Vec<Column> = (0..n_features)
        .map(|i| {
            let values: Vec<Option<f64>> = (0..n_rows)
                .map(|_| {
                    if rng.gen::<f64>() < null_rate {
                        None
                    } else if i % 2 == 1 {
                        Some(rng.gen_range(0..5) as f64)
                    } else {
                        Some(rng.gen::<f64>() * 1_000_000.0)
                    }
                })
                .collect();
            Column::new(format!("feature_{}", i).into(), values)
        })
        .collect();

    DataFrame::new(columns).expect("Failed to create DataFrame")
}

/// Profile and row counts for varying row counts
fn benchmark_profile_by_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("profile_by_rows");
    group.sample_size(20);

    // Melbourne housing has 21 columns and ~13k rows
    let n_cols = 21;
    let row_counts = [1_000, 13_580, 50_000, 100_000];

    for n_rows in row_counts {
        let df = generate_test_dataframe(n_rows, n_cols, 0.1, 42);

        group.throughput(Throughput::Elements((n_rows * n_cols) as u64));

        group.bench_with_input(BenchmarkId::new("profile", n_rows), &df, |b, df| {
            b.iter(|| MissingProfile::compute(black_box(df)));
        });

        group.bench_with_input(BenchmarkId::new("row_counts", n_rows), &df, |b, df| {
            b.iter(|| row_missing_counts(black_box(df)));
        });

        group.bench_with_input(BenchmarkId::new("prune_sparse_rows", n_rows), &df, |b, df| {
            b.iter(|| drop_rows_with_missing_count_above(black_box(df), black_box(5)));
        });
    }

    group.finish();
}

/// Mean vs mode imputation on a single column
fn benchmark_imputation(c: &mut Criterion) {
    let mut group = c.benchmark_group("imputation");
    group.sample_size(30);

    let df = generate_test_dataframe(100_000, 2, 0.2, 7);

    group.bench_with_input(BenchmarkId::new("mean", "continuous"), &df, |b, df| {
        b.iter(|| impute_mean(black_box(df), black_box("feature_0")));
    });

    group.bench_with_input(BenchmarkId::new("mode", "counts"), &df, |b, df| {
        b.iter(|| impute_mode(black_box(df), black_box("feature_1")));
    });

    group.finish();
}

criterion_group!(benches, benchmark_profile_by_rows, benchmark_imputation);
criterion_main!(benches);
