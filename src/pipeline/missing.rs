//! Missing value profiling
//!
//! All functions here are pure reads over a table snapshot. A profile is
//! recomputed after every mutation and never treated as authoritative state.

use polars::prelude::*;

/// Direction along which missing flags are reduced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// One flag per column (pandas `axis=0`)
    Columns,
    /// One flag per row (pandas `axis=1`)
    Rows,
}

/// Count of missing values per column, in table column order
pub fn column_missing_counts(df: &DataFrame) -> Vec<(String, usize)> {
    df.get_columns()
        .iter()
        .map(|column| (column.name().to_string(), column.null_count()))
        .collect()
}

/// Percentage of missing values per column: `100 * count / rows`.
///
/// A table with zero rows reports NaN for every column.
pub fn column_missing_percentages(df: &DataFrame) -> Vec<(String, f64)> {
    let rows = df.height();
    column_missing_counts(df)
        .into_iter()
        .map(|(name, count)| (name, percentage(count, rows)))
        .collect()
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        f64::NAN
    } else {
        100.0 * count as f64 / total as f64
    }
}

/// Round for display, the way `round(x, precision)` does. NaN stays NaN.
pub fn round_to(value: f64, precision: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

/// Per-column null masks; one `Vec<bool>` per column, `true` where absent
fn null_masks(df: &DataFrame) -> Vec<Vec<bool>> {
    df.get_columns()
        .iter()
        .map(|column| {
            if column.null_count() == 0 {
                vec![false; column.len()]
            } else {
                let mask = column.as_materialized_series().is_null();
                (&mask)
                    .into_iter()
                    .map(|flag| flag.unwrap_or(false))
                    .collect()
            }
        })
        .collect()
}

/// Count of missing fields in each row, aligned to row order
pub fn row_missing_counts(df: &DataFrame) -> Vec<usize> {
    let mut counts = vec![0usize; df.height()];
    for mask in null_masks(df) {
        for (count, is_null) in counts.iter_mut().zip(mask) {
            if is_null {
                *count += 1;
            }
        }
    }
    counts
}

/// True where at least one field along `axis` is missing
pub fn any_missing(df: &DataFrame, axis: Axis) -> Vec<bool> {
    match axis {
        Axis::Columns => df
            .get_columns()
            .iter()
            .map(|column| column.null_count() > 0)
            .collect(),
        Axis::Rows => row_missing_counts(df).into_iter().map(|n| n > 0).collect(),
    }
}

/// True only where every field along `axis` is missing.
///
/// An empty axis is vacuously all-missing: a zero-row column, or a row of a
/// zero-width table.
pub fn all_missing(df: &DataFrame, axis: Axis) -> Vec<bool> {
    match axis {
        Axis::Columns => df
            .get_columns()
            .iter()
            .map(|column| column.null_count() == column.len())
            .collect(),
        Axis::Rows => {
            let width = df.width();
            row_missing_counts(df)
                .into_iter()
                .map(|n| n == width)
                .collect()
        }
    }
}

/// Number of rows with strictly more than `max_missing` missing fields
pub fn rows_with_missing_above(df: &DataFrame, max_missing: usize) -> usize {
    row_missing_counts(df)
        .into_iter()
        .filter(|&n| n > max_missing)
        .count()
}

/// Missing value statistics for a single column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMissing {
    pub name: String,
    pub count: usize,
    pub percentage: f64,
}

/// Snapshot of missing values in a table along both axes
#[derive(Debug, Clone)]
pub struct MissingProfile {
    pub rows: usize,
    pub columns: Vec<ColumnMissing>,
    pub row_counts: Vec<usize>,
}

impl MissingProfile {
    pub fn compute(df: &DataFrame) -> Self {
        let rows = df.height();
        let columns = column_missing_counts(df)
            .into_iter()
            .map(|(name, count)| ColumnMissing {
                name,
                count,
                percentage: percentage(count, rows),
            })
            .collect();

        Self {
            rows,
            columns,
            row_counts: row_missing_counts(df),
        }
    }

    /// Total missing cells; identical whether summed by column or by row
    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(|c| c.count).sum()
    }

    /// Look up a column's statistics by name
    pub fn column(&self, name: &str) -> Option<&ColumnMissing> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns with at least one missing value, highest percentage first
    pub fn columns_with_missing(&self) -> Vec<&ColumnMissing> {
        let mut cols: Vec<&ColumnMissing> = self.columns.iter().filter(|c| c.count > 0).collect();
        cols.sort_by(|a, b| {
            b.percentage
                .partial_cmp(&a.percentage)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        cols
    }

    pub fn rows_with_any_missing(&self) -> usize {
        self.row_counts.iter().filter(|&&n| n > 0).count()
    }

    pub fn rows_with_all_missing(&self) -> usize {
        let width = self.columns.len();
        self.row_counts.iter().filter(|&&n| n == width).count()
    }
}
