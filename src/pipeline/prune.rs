//! Column and row pruning
//!
//! Every function returns a new table and leaves its input untouched. Row
//! filters are stable: survivors keep their relative order.

use polars::prelude::*;
use tracing::debug;

use super::error::{CleanError, CleanResult};
use super::missing::{row_missing_counts, MissingProfile};

/// Columns whose missing percentage strictly exceeds `threshold_pct`.
///
/// Columns listed in `protected` are never selected. NaN percentages
/// (zero-row tables) only qualify when the threshold is negative.
pub fn columns_above_threshold(
    profile: &MissingProfile,
    threshold_pct: f64,
    protected: &[String],
) -> Vec<String> {
    profile
        .columns
        .iter()
        .filter(|c| !protected.contains(&c.name))
        .filter(|c| {
            if c.percentage.is_nan() {
                threshold_pct < 0.0
            } else {
                c.percentage > threshold_pct
            }
        })
        .map(|c| c.name.clone())
        .collect()
}

fn ensure_columns_exist<S: AsRef<str>>(df: &DataFrame, names: &[S]) -> CleanResult<()> {
    for name in names {
        let name = name.as_ref();
        if df.column(name).is_err() {
            return Err(CleanError::ColumnNotFound(name.to_string()));
        }
    }
    Ok(())
}

/// Drop the named columns. Fails without dropping anything if any name is absent.
pub fn drop_columns<S: AsRef<str>>(df: &DataFrame, names: &[S]) -> CleanResult<DataFrame> {
    ensure_columns_exist(df, names)?;
    Ok(df.drop_many(names.iter().map(|n| n.as_ref())))
}

/// Drop every column whose missing percentage strictly exceeds `threshold_pct`.
///
/// Returns the pruned table and the names that were dropped.
pub fn drop_columns_above(
    df: &DataFrame,
    threshold_pct: f64,
    protected: &[String],
) -> CleanResult<(DataFrame, Vec<String>)> {
    let profile = MissingProfile::compute(df);
    let to_drop = columns_above_threshold(&profile, threshold_pct, protected);
    debug!(threshold_pct, dropped = ?to_drop, "column pruning");
    let pruned = drop_columns(df, &to_drop)?;
    Ok((pruned, to_drop))
}

/// Keep rows whose missing-field count is at most `max_missing`
pub fn drop_rows_with_missing_count_above(
    df: &DataFrame,
    max_missing: usize,
) -> CleanResult<DataFrame> {
    let keep: Vec<bool> = row_missing_counts(df)
        .into_iter()
        .map(|n| n <= max_missing)
        .collect();
    filter_rows(df, &keep)
}

/// Keep only rows where every named column has a value
pub fn drop_rows_with_missing_in<S: AsRef<str>>(
    df: &DataFrame,
    columns: &[S],
) -> CleanResult<DataFrame> {
    ensure_columns_exist(df, columns)?;

    let mut keep = vec![true; df.height()];
    for name in columns {
        let column = df.column(name.as_ref())?;
        if column.null_count() == 0 {
            continue;
        }
        let mask = column.as_materialized_series().is_not_null();
        for (slot, present) in keep.iter_mut().zip(&mask) {
            *slot &= present.unwrap_or(false);
        }
    }
    filter_rows(df, &keep)
}

fn filter_rows(df: &DataFrame, keep: &[bool]) -> CleanResult<DataFrame> {
    if keep.iter().all(|&k| k) {
        return Ok(df.clone());
    }
    let mask = BooleanChunked::from_slice(PlSmallStr::EMPTY, keep);
    let filtered = df.filter(&mask)?;
    debug!(
        before = df.height(),
        after = filtered.height(),
        "row pruning"
    );
    Ok(filtered)
}
