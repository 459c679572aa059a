//! Tests for grouped statistics, pivot tables, charts and summaries

use nullsweep::pipeline::{
    clean_housing_data, most_frequent_value, CleanError, CleaningConfig, ColumnImputation,
    FillValue, ImputeStrategy,
};
use nullsweep::report::{
    category_means, dataframe_table, describe_columns, five_number_summary, group_stats,
    grouped_values, histogram_counts, pivot_mean, value_counts, CleaningSummary,
};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

use common::*;

fn listings() -> DataFrame {
    df! {
        "Type" => ["h", "u", "h", "t", "u", "h"],
        "Bathroom" => [1i64, 1, 2, 1, 1, 2],
        "Price" => [1_000_000.0f64, 500_000.0, 1_400_000.0, 800_000.0, 700_000.0, 1_600_000.0],
        "Landsize" => [200.0f64, 0.0, 400.0, 150.0, 0.0, 600.0],
    }
    .unwrap()
}

#[test]
fn test_group_stats() {
    let df = listings();

    let stats = group_stats(&df, "Type", "Price").unwrap();

    assert_eq!(stats.height(), 3);
    assert_eq!(stats.get_column_names(), &["Type", "count", "mean", "median"]);
    let keys: Vec<Option<String>> = stats
        .column("Type")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    assert_eq!(
        keys,
        vec![Some("h".to_string()), Some("t".to_string()), Some("u".to_string())]
    );
    assert_eq!(f64_values(&stats, "count"), vec![Some(3.0), Some(1.0), Some(2.0)]);
    let means = f64_values(&stats, "mean");
    assert!((means[0].unwrap() - 4_000_000.0 / 3.0).abs() < 1e-6);
    assert_eq!(means[1..], [Some(800_000.0), Some(600_000.0)]);
    assert_eq!(f64_values(&stats, "median")[0], Some(1_400_000.0));
}

#[test]
fn test_group_stats_errors() {
    let df = listings();

    assert!(matches!(
        group_stats(&df, "Regionname", "Price"),
        Err(CleanError::ColumnNotFound(_))
    ));
    assert!(matches!(
        group_stats(&df, "Price", "Type"),
        Err(CleanError::TypeMismatch { .. })
    ));
}

#[test]
fn test_pivot_mean() {
    let df = listings();

    let pivot = pivot_mean(&df, &["Type", "Bathroom"]).unwrap();

    // (h,1) (h,2) (t,1) (u,1)
    assert_eq!(pivot.height(), 4);
    assert_eq!(
        pivot.get_column_names(),
        &["Type", "Bathroom", "Price", "Landsize"]
    );
    assert_eq!(
        f64_values(&pivot, "Price"),
        vec![Some(1_000_000.0), Some(1_500_000.0), Some(800_000.0), Some(600_000.0)]
    );
    assert_eq!(f64_values(&pivot, "Landsize")[1], Some(500.0));
}

#[test]
fn test_pivot_mean_unknown_index() {
    let df = listings();

    let result = pivot_mean(&df, &["Type", "Rooms"]);

    assert!(matches!(result, Err(CleanError::ColumnNotFound(name)) if name == "Rooms"));
}

#[test]
fn test_category_means() {
    let df = listings();

    let means = category_means(&df, "Type", "Price").unwrap();

    assert_eq!(means.len(), 3);
    assert_eq!(means[1], ("t".to_string(), 800_000.0));
    assert_eq!(means[2], ("u".to_string(), 600_000.0));
}

#[test]
fn test_grouped_values_skip_missing() {
    let df = create_housing_dataframe();

    let groups = grouped_values(&df, "Type", "Price").unwrap();

    // Both missing prices are in type "u" rows
    assert_eq!(groups["u"].len(), 1);
    assert_eq!(groups["h"].len(), 5);
    assert_eq!(groups["t"].len(), 2);
}

#[test]
fn test_five_number_summary() {
    let summary = five_number_summary(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();

    assert_eq!(summary.min, 1.0);
    assert_eq!(summary.q1, 2.0);
    assert_eq!(summary.median, 3.0);
    assert_eq!(summary.q3, 4.0);
    assert_eq!(summary.max, 5.0);
    assert!(five_number_summary(&[]).is_none());
}

#[test]
fn test_histogram_counts_cover_every_value() {
    let values: Vec<f64> = (0..100).map(|v| v as f64).collect();

    let hist = histogram_counts(&values, 10);

    assert_eq!(hist.len(), 10);
    assert!(hist.iter().all(|(_, count)| *count == 10));
    assert_eq!(hist[0].0, 0.0);
}

#[test]
fn test_dataframe_table_renders_rows() {
    let table = dataframe_table(&listings(), 2);
    let rendered = table.to_string();

    assert!(rendered.contains("Price"));
    assert!(rendered.contains("1000000.00"));
    assert!(!rendered.contains("1600000.00"));
}

#[test]
fn test_cleaning_summary_from_outcome() {
    let config = CleaningConfig {
        drop_rows_missing: vec!["Price".to_string(), "Landsize".to_string()],
        imputations: vec![
            ColumnImputation::new("Lattitude", ImputeStrategy::Mean),
            ColumnImputation::new("Car", ImputeStrategy::Mode),
        ],
        ..CleaningConfig::default()
    };
    let outcome = clean_housing_data(create_housing_dataframe(), &config).unwrap();

    let summary = CleaningSummary::from_outcome(&outcome);

    assert_eq!(summary.initial_rows, 10);
    assert_eq!(summary.final_rows, 7);
    assert_eq!(summary.final_columns, 5);
    assert!((summary.retained_fraction() - 0.7).abs() < 1e-12);
    assert_eq!(summary.imputations.len(), 2);
}

#[test]
fn test_cleaning_summary_empty_input() {
    let summary = CleaningSummary::default();

    assert!(summary.retained_fraction().is_nan());
}

#[test]
fn test_describe_columns() {
    let df = df! {
        "Rooms" => [Some(1i64), Some(2), None, Some(3), Some(4), Some(5)],
        "Price" => [Some(1.0f64), None, None, None, None, None],
    }
    .unwrap();

    let stats = describe_columns(&df, &["Rooms", "Price"]).unwrap();

    assert_eq!(stats.get_column_names(), &["statistic", "Rooms", "Price"]);
    let labels: Vec<Option<String>> = stats
        .column("statistic")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    assert_eq!(
        labels,
        ["count", "mean", "std", "min", "25%", "50%", "75%", "max"]
            .iter()
            .map(|s| Some(s.to_string()))
            .collect::<Vec<_>>()
    );

    let rooms = f64_values(&stats, "Rooms");
    assert_eq!(rooms[0], Some(5.0));
    assert_eq!(rooms[1], Some(3.0));
    assert!((rooms[2].unwrap() - 2.5f64.sqrt()).abs() < 1e-9);
    assert_eq!(rooms[3..], [Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)]);

    // A single value has no sample deviation
    let price = f64_values(&stats, "Price");
    assert_eq!(price[0], Some(1.0));
    assert_eq!(price[2], None);
    assert_eq!(price[7], Some(1.0));
}

#[test]
fn test_describe_columns_errors() {
    let df = listings();

    assert!(matches!(
        describe_columns(&df, &["Rooms"]),
        Err(CleanError::ColumnNotFound(name)) if name == "Rooms"
    ));
    assert!(matches!(
        describe_columns(&df, &["Price", "Type"]),
        Err(CleanError::TypeMismatch { .. })
    ));
}

#[test]
fn test_describe_no_columns_has_only_labels() {
    let stats = describe_columns::<&str>(&listings(), &[]).unwrap();

    assert_shape(&stats, 8, 1);
}

#[test]
fn test_value_counts_most_frequent_first() {
    let df = create_housing_dataframe();

    let counts = value_counts(&df, "Car").unwrap();

    assert_eq!(counts.get_column_names(), &["Car", "count"]);
    assert_eq!(f64_values(&counts, "Car"), vec![Some(2.0), Some(1.0), Some(3.0)]);
    assert_eq!(f64_values(&counts, "count"), vec![Some(5.0), Some(3.0), Some(1.0)]);
    // The missing Car is not a category
    let total: f64 = f64_values(&counts, "count").iter().flatten().sum();
    assert_eq!(total, 9.0);
}

#[test]
fn test_value_counts_ties_keep_first_seen_order() {
    let df = df! { "Type" => [Some("u"), Some("t"), None, Some("h"), Some("t"), Some("u"), Some("h")] }.unwrap();

    let counts = value_counts(&df, "Type").unwrap();

    let values: Vec<Option<String>> = counts
        .column("Type")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    assert_eq!(
        values,
        vec![Some("u".to_string()), Some("t".to_string()), Some("h".to_string())]
    );
    assert_eq!(
        most_frequent_value(&df, "Type").unwrap(),
        Some(FillValue::Text("u".to_string()))
    );
}

#[test]
fn test_value_counts_unknown_column() {
    assert!(matches!(
        value_counts(&listings(), "Regionname"),
        Err(CleanError::ColumnNotFound(_))
    ));
}
