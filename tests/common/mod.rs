//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Ten listings with a known missing pattern
///
/// - `Price`: 2 missing (rows 1 and 5)
/// - `Landsize`: 1 missing (row 2)
/// - `Lattitude`: 1 missing (row 3)
/// - `Car`: 1 missing (row 4); after the Price/Landsize row drops its most
///   frequent value is 2
/// - `Type`: complete categorical
pub fn create_housing_dataframe() -> DataFrame {
    df! {
        "Price" => [Some(1_200_000.0f64), None, Some(850_000.0), Some(640_000.0), Some(1_050_000.0),
                    None, Some(910_000.0), Some(720_000.0), Some(1_480_000.0), Some(560_000.0)],
        "Landsize" => [Some(100.0f64), Some(150.0), None, Some(120.0), Some(300.0),
                       Some(210.0), Some(180.0), Some(95.0), Some(640.0), Some(130.0)],
        "Lattitude" => [Some(-37.80f64), Some(-37.81), Some(-37.79), None, Some(-37.82),
                        Some(-37.80), Some(-37.83), Some(-37.78), Some(-37.81), Some(-37.80)],
        "Car" => [Some(2i64), Some(1), Some(2), Some(3), None,
                  Some(1), Some(2), Some(2), Some(1), Some(2)],
        "Type" => ["h", "u", "h", "t", "h", "u", "h", "t", "h", "u"],
    }
    .unwrap()
}

/// Seven columns by seven rows where each row has exactly one value,
/// so every row has six missing fields
pub fn create_sparse_dataframe() -> DataFrame {
    let names = ["Price", "Landsize", "Lattitude", "Car", "Bathroom", "Bedroom2", "Distance"];
    let columns: Vec<Column> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let values: Vec<Option<f64>> = (0..names.len())
                .map(|row| if row == i { Some(row as f64 + 1.0) } else { None })
                .collect();
            Column::new((*name).into(), values)
        })
        .collect();
    DataFrame::new(columns).unwrap()
}

/// A DataFrame with specific missing value percentages
pub fn create_missing_test_dataframe() -> DataFrame {
    df! {
        "col_complete" => [1.0f64, 2.0, 3.0, 4.0, 5.0],
        "col_20pct_missing" => [Some(1.0f64), None, Some(3.0), Some(4.0), Some(5.0)],
        "col_40pct_missing" => [Some(1.0f64), Some(2.0), None, None, Some(5.0)],
        "col_all_missing" => [None::<f64>, None, None, None, None],
        "label" => [Some("a"), Some("b"), None, Some("d"), Some("e")],
    }
    .unwrap()
}

/// A random table with roughly `null_rate` of its cells missing
pub fn create_random_missing_dataframe(rows: usize, cols: usize, null_rate: f64, seed: u64) -> DataFrame {
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    let columns: Vec<Column> = (0..cols)
        .map(|i| {
            let values: Vec<Option<f64>> = (0..rows)
                .map(|_| {
                    if rng.gen::<f64>() < null_rate {
                        None
                    } else {
                        Some(rng.gen::<f64>() * 100.0)
                    }
                })
                .collect();
            Column::new(format!("feature_{}", i).into(), values)
        })
        .collect();

    DataFrame::new(columns).unwrap()
}

/// Write raw text to a temporary CSV file
pub fn write_temp_csv(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("listings.csv");
    std::fs::write(&csv_path, contents).unwrap();
    (temp_dir, csv_path)
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

/// Assert that a DataFrame does NOT contain specific columns
pub fn assert_missing_columns(df: &DataFrame, unexpected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in unexpected_cols {
        assert!(
            !actual_cols.contains(&col.to_string()),
            "Unexpected column still present: '{}'",
            col
        );
    }
}

/// Values of a Float64 column as options, for direct comparison
pub fn f64_values(df: &DataFrame, column: &str) -> Vec<Option<f64>> {
    df.column(column)
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

/// Total number of null cells in a DataFrame
pub fn total_nulls(df: &DataFrame) -> usize {
    df.get_columns().iter().map(|c| c.null_count()).sum()
}
