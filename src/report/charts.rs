//! Terminal charts: histogram, box plot, grouped box plot, category bar chart
//!
//! Charts are drawn with block characters on stdout. They are illustrative
//! only and nothing downstream reads them.

use std::collections::BTreeMap;

use console::style;
use polars::prelude::*;

use crate::pipeline::{is_numeric_dtype, CleanError, CleanResult};

const BAR_WIDTH: usize = 40;
const BOX_WIDTH: usize = 50;

/// Five-number summary of a sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiveNumber {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Present, non-NaN values of a numeric column as f64
pub fn numeric_values(df: &DataFrame, column: &str) -> CleanResult<Vec<f64>> {
    let col = df
        .column(column)
        .map_err(|_| CleanError::ColumnNotFound(column.to_string()))?;
    if !is_numeric_dtype(col.dtype()) {
        return Err(CleanError::TypeMismatch {
            column: column.to_string(),
            expected: "numeric",
            actual: col.dtype().to_string(),
        });
    }
    let floats = col.cast(&DataType::Float64)?;
    Ok(floats
        .f64()?
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .collect())
}

/// Values of `value` grouped by the string form of `by`, keys sorted.
/// Rows with a missing key or value are skipped.
pub fn grouped_values(df: &DataFrame, by: &str, value: &str) -> CleanResult<BTreeMap<String, Vec<f64>>> {
    let keys = df
        .column(by)
        .map_err(|_| CleanError::ColumnNotFound(by.to_string()))?
        .cast(&DataType::String)?;
    let values = df
        .column(value)
        .map_err(|_| CleanError::ColumnNotFound(value.to_string()))?;
    if !is_numeric_dtype(values.dtype()) {
        return Err(CleanError::TypeMismatch {
            column: value.to_string(),
            expected: "numeric",
            actual: values.dtype().to_string(),
        });
    }
    let values = values.cast(&DataType::Float64)?;

    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (key, v) in keys.str()?.into_iter().zip(values.f64()?.into_iter()) {
        if let (Some(key), Some(v)) = (key, v) {
            if !v.is_nan() {
                groups.entry(key.to_string()).or_default().push(v);
            }
        }
    }
    Ok(groups)
}

/// Quantile with linear interpolation between closest ranks.
/// `sorted` must be ascending and non-empty.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Five-number summary; `None` for an empty sample
pub fn five_number_summary(values: &[f64]) -> Option<FiveNumber> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    Some(FiveNumber {
        min: sorted[0],
        q1: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.5),
        q3: quantile_sorted(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

/// Equal-width bucket counts. Returns `(lower_edge, count)` per bin.
pub fn histogram_counts(values: &[f64], bins: usize) -> Vec<(f64, usize)> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = if width == 0.0 {
            0
        } else {
            (((v - min) / width) as usize).min(bins - 1)
        };
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| (min + width * i as f64, count))
        .collect()
}

fn bar(len: usize) -> String {
    "█".repeat(len)
}

fn print_chart_title(title: &str) {
    println!();
    println!("    {} {}", style("▥").cyan(), style(title).white().bold());
}

fn print_no_data() {
    println!("      {}", style("(no data)").dim());
}

/// Print a histogram of a numeric column
pub fn print_histogram(df: &DataFrame, column: &str, bins: usize) -> CleanResult<()> {
    print_chart_title(&format!("Histogram of {}", column));
    let values = numeric_values(df, column)?;
    let counts = histogram_counts(&values, bins);
    let peak = counts.iter().map(|(_, c)| *c).max().unwrap_or(0);
    if peak == 0 {
        print_no_data();
        return Ok(());
    }

    for (edge, count) in counts {
        let len = (count * BAR_WIDTH + peak - 1) / peak;
        println!(
            "      {:>14.1} │{} {}",
            edge,
            style(bar(len)).cyan(),
            style(count).dim()
        );
    }
    Ok(())
}

/// One box-plot line scaled to `[lo, hi]`
fn box_line(summary: &FiveNumber, lo: f64, hi: f64) -> String {
    let span = hi - lo;
    let pos = |v: f64| -> usize {
        if span == 0.0 {
            BOX_WIDTH / 2
        } else {
            (((v - lo) / span) * (BOX_WIDTH - 1) as f64).round() as usize
        }
    };

    let (p_min, p_q1, p_med, p_q3, p_max) = (
        pos(summary.min),
        pos(summary.q1),
        pos(summary.median),
        pos(summary.q3),
        pos(summary.max),
    );

    let mut line = vec![' '; BOX_WIDTH];
    for slot in line.iter_mut().take(p_max + 1).skip(p_min) {
        *slot = '─';
    }
    for slot in line.iter_mut().take(p_q3 + 1).skip(p_q1) {
        *slot = '▒';
    }
    line[p_min] = '├';
    line[p_max] = '┤';
    line[p_med] = '┃';
    line.into_iter().collect()
}

fn print_summary_numbers(summary: &FiveNumber) {
    println!(
        "      {}",
        style(format!(
            "min {:.1}  q1 {:.1}  median {:.1}  q3 {:.1}  max {:.1}",
            summary.min, summary.q1, summary.median, summary.q3, summary.max
        ))
        .dim()
    );
}

/// Print a box plot of a numeric column
pub fn print_box_plot(df: &DataFrame, column: &str) -> CleanResult<()> {
    print_chart_title(&format!("Box plot of {}", column));
    let values = numeric_values(df, column)?;
    match five_number_summary(&values) {
        Some(summary) => {
            println!("      {}", box_line(&summary, summary.min, summary.max));
            print_summary_numbers(&summary);
        }
        None => print_no_data(),
    }
    Ok(())
}

/// Print one box plot per category of `by`, sharing a common scale
pub fn print_grouped_box_plot(df: &DataFrame, value: &str, by: &str) -> CleanResult<()> {
    print_chart_title(&format!("Box plot of {} by {}", value, by));
    let groups = grouped_values(df, by, value)?;
    let summaries: Vec<(String, FiveNumber)> = groups
        .into_iter()
        .filter_map(|(key, values)| five_number_summary(&values).map(|s| (key, s)))
        .collect();

    if summaries.is_empty() {
        print_no_data();
        return Ok(());
    }

    let lo = summaries.iter().map(|(_, s)| s.min).fold(f64::INFINITY, f64::min);
    let hi = summaries.iter().map(|(_, s)| s.max).fold(f64::NEG_INFINITY, f64::max);
    let label_width = summaries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);

    for (key, summary) in &summaries {
        println!(
            "      {:>width$} {}  {}",
            key,
            box_line(summary, lo, hi),
            style(format!("median {:.1}", summary.median)).dim(),
            width = label_width
        );
    }
    println!(
        "      {:>width$} {}",
        "",
        style(format!("{:<w2$.1}{:>w2$.1}", lo, hi, w2 = BOX_WIDTH / 2)).dim(),
        width = label_width
    );
    Ok(())
}

/// Mean of `value` per category of `by`, keys sorted
pub fn category_means(df: &DataFrame, by: &str, value: &str) -> CleanResult<Vec<(String, f64)>> {
    Ok(grouped_values(df, by, value)?
        .into_iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(key, values)| {
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            (key, mean)
        })
        .collect())
}

/// Print a bar chart of per-category means
pub fn print_category_bar_chart(df: &DataFrame, value: &str, by: &str) -> CleanResult<()> {
    print_chart_title(&format!("Mean {} by {}", value, by));
    let means = category_means(df, by, value)?;
    let peak = means.iter().map(|(_, m)| m.abs()).fold(0.0, f64::max);
    if means.is_empty() || peak == 0.0 {
        print_no_data();
        return Ok(());
    }

    let label_width = means.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, mean) in &means {
        let len = ((mean.abs() / peak) * BAR_WIDTH as f64).round() as usize;
        println!(
            "      {:>width$} │{} {:.1}",
            key,
            style(bar(len)).magenta(),
            mean,
            width = label_width
        );
    }
    Ok(())
}
