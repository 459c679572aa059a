//! Tabular views: missing value tables, descriptive statistics, value
//! counts, grouped statistics and pivot tables

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;
use polars::prelude::*;

use crate::pipeline::{is_numeric_dtype, round_to, CleanError, CleanResult, MissingProfile};

/// Count, mean and median of `value` for each distinct `by`, sorted by key
pub fn group_stats(df: &DataFrame, by: &str, value: &str) -> CleanResult<DataFrame> {
    for name in [by, value] {
        if df.column(name).is_err() {
            return Err(CleanError::ColumnNotFound(name.to_string()));
        }
    }
    let dtype = df.column(value)?.dtype().clone();
    if !is_numeric_dtype(&dtype) {
        return Err(CleanError::TypeMismatch {
            column: value.to_string(),
            expected: "numeric",
            actual: dtype.to_string(),
        });
    }

    let out = df
        .clone()
        .lazy()
        .group_by([col(by)])
        .agg([
            col(value).count().alias("count"),
            col(value).mean().alias("mean"),
            col(value).median().alias("median"),
        ])
        .sort_by_exprs([col(by)], SortMultipleOptions::default())
        .collect()?;
    Ok(out)
}

/// Mean of every other numeric column grouped by the `index` columns,
/// sorted by the index.
pub fn pivot_mean<S: AsRef<str>>(df: &DataFrame, index: &[S]) -> CleanResult<DataFrame> {
    let index: Vec<&str> = index.iter().map(|s| s.as_ref()).collect();
    for name in &index {
        if df.column(name).is_err() {
            return Err(CleanError::ColumnNotFound(name.to_string()));
        }
    }

    let values: Vec<Expr> = df
        .get_columns()
        .iter()
        .filter(|c| is_numeric_dtype(c.dtype()) && !index.contains(&c.name().as_str()))
        .map(|c| col(c.name().as_str()).mean())
        .collect();

    let keys: Vec<Expr> = index.iter().map(|name| col(*name)).collect();

    let out = df
        .clone()
        .lazy()
        .group_by(keys.clone())
        .agg(values)
        .sort_by_exprs(keys, SortMultipleOptions::default())
        .collect()?;
    Ok(out)
}

const DESCRIBE_STATS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Count, mean, sample std, min, quartiles and max of each numeric column.
///
/// One row per statistic, one Float64 column per input column, led by a
/// `statistic` label column. Quartiles interpolate linearly.
pub fn describe_columns<S: AsRef<str>>(df: &DataFrame, columns: &[S]) -> CleanResult<DataFrame> {
    let names: Vec<&str> = columns.iter().map(|s| s.as_ref()).collect();
    let mut exprs = Vec::with_capacity(names.len() * DESCRIBE_STATS.len());
    for (i, name) in names.iter().enumerate() {
        let dtype = df
            .column(name)
            .map_err(|_| CleanError::ColumnNotFound(name.to_string()))?
            .dtype()
            .clone();
        if !is_numeric_dtype(&dtype) {
            return Err(CleanError::TypeMismatch {
                column: name.to_string(),
                expected: "numeric",
                actual: dtype.to_string(),
            });
        }

        let values = col(*name).cast(DataType::Float64);
        let stats = [
            values.clone().count(),
            values.clone().mean(),
            values.clone().std(1),
            values.clone().min(),
            values.clone().quantile(lit(0.25), QuantileMethod::Linear),
            values.clone().median(),
            values.clone().quantile(lit(0.75), QuantileMethod::Linear),
            values.max(),
        ];
        exprs.extend(
            stats
                .into_iter()
                .enumerate()
                .map(|(j, e)| e.cast(DataType::Float64).alias(format!("{}_{}", i, j))),
        );
    }

    let mut out = vec![Column::new("statistic".into(), DESCRIBE_STATS)];
    if !exprs.is_empty() {
        let row = df.clone().lazy().select(exprs).collect()?;
        for (i, name) in names.iter().enumerate() {
            let values = (0..DESCRIBE_STATS.len())
                .map(|j| Ok(row.column(&format!("{}_{}", i, j))?.f64()?.get(0)))
                .collect::<CleanResult<Vec<Option<f64>>>>()?;
            out.push(Column::new((*name).into(), values));
        }
    }
    Ok(DataFrame::new(out)?)
}

/// Distinct non-missing values of `column` with their frequency, most
/// frequent first. Ties keep the order in which values first appear, so the
/// first row is the value mode imputation fills with.
pub fn value_counts(df: &DataFrame, column: &str) -> CleanResult<DataFrame> {
    if df.column(column).is_err() {
        return Err(CleanError::ColumnNotFound(column.to_string()));
    }

    let out = df
        .clone()
        .lazy()
        .select([col(column)])
        .filter(col(column).is_not_null())
        .group_by_stable([col(column)])
        .agg([len().alias("count")])
        .sort_by_exprs(
            [col("count")],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_maintain_order(true),
        )
        .collect()?;
    Ok(out)
}

fn format_value(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Float64(v) => format!("{:.2}", v),
        AnyValue::Float32(v) => format!("{:.2}", v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Render a DataFrame as a comfy-table, at most `max_rows` rows
pub fn dataframe_table(df: &DataFrame, max_rows: usize) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(
        df.get_column_names()
            .iter()
            .map(|name| Cell::new(name.as_str()).add_attribute(Attribute::Bold)),
    );

    for row in 0..df.height().min(max_rows) {
        let cells = df.get_columns().iter().map(|column| {
            let text = column
                .get(row)
                .map(|v| format_value(&v))
                .unwrap_or_default();
            let cell = Cell::new(text);
            if is_numeric_dtype(column.dtype()) {
                cell.set_alignment(CellAlignment::Right)
            } else {
                cell
            }
        });
        table.add_row(cells);
    }

    table
}

/// Print a table indented under a section title
pub fn print_titled_table(title: &str, table: &Table) {
    println!();
    println!("    {} {}", style("▤").cyan(), style(title).white().bold());
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

/// Print the per-column missing percentage table.
///
/// Columns with nothing missing are folded into a single trailing line.
pub fn print_missing_table(profile: &MissingProfile, precision: u32) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Column").add_attribute(Attribute::Bold),
        Cell::new("Missing").add_attribute(Attribute::Bold),
        Cell::new("Missing %").add_attribute(Attribute::Bold),
    ]);

    let with_missing = profile.columns_with_missing();
    for column in &with_missing {
        let pct = round_to(column.percentage, precision);
        let color = if pct > 30.0 {
            Color::Red
        } else if pct > 5.0 {
            Color::Yellow
        } else {
            Color::White
        };
        table.add_row(vec![
            Cell::new(&column.name),
            Cell::new(column.count).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.*}", precision as usize, pct))
                .fg(color)
                .set_alignment(CellAlignment::Right),
        ]);
    }

    print_titled_table(
        &format!("Missing values ({} rows)", profile.rows),
        &table,
    );

    let complete = profile.columns.len() - with_missing.len();
    if complete > 0 {
        println!(
            "      {} column(s) have no missing values",
            style(complete).green()
        );
    }
}
