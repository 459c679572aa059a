//! Missing value imputation
//!
//! Fill statistics are computed once from the values present before any
//! replacement. A column with nothing missing is returned unchanged.

use std::collections::HashMap;
use std::fmt;

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{CleanError, CleanResult};

/// A literal used to fill missing cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FillValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for FillValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillValue::Number(n) if n.fract() == 0.0 && n.is_finite() => write!(f, "{}", *n as i64),
            FillValue::Number(n) => write!(f, "{:.4}", n),
            FillValue::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// How a single column's missing values are filled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum ImputeStrategy {
    /// Arithmetic mean of the present values
    Mean,
    /// Median of the present values
    Median,
    /// Most frequent present value, ties to the first encountered
    Mode,
    /// A fixed literal
    Constant { value: FillValue },
}

impl ImputeStrategy {
    pub fn label(&self) -> &'static str {
        match self {
            ImputeStrategy::Mean => "mean",
            ImputeStrategy::Median => "median",
            ImputeStrategy::Mode => "mode",
            ImputeStrategy::Constant { .. } => "constant",
        }
    }
}

/// What an imputation step did to one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImputationRecord {
    pub column: String,
    pub strategy: String,
    /// None when nothing was missing and no fill was needed
    pub fill_value: Option<FillValue>,
    pub filled: usize,
}

#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

#[inline]
fn is_integer_dtype(dtype: &DataType) -> bool {
    is_numeric_dtype(dtype) && !matches!(dtype, DataType::Float32 | DataType::Float64)
}

fn numeric_series<'a>(df: &'a DataFrame, column: &str) -> CleanResult<&'a Series> {
    let series = df
        .column(column)
        .map_err(|_| CleanError::ColumnNotFound(column.to_string()))?
        .as_materialized_series();
    if !is_numeric_dtype(series.dtype()) {
        return Err(CleanError::TypeMismatch {
            column: column.to_string(),
            expected: "numeric",
            actual: series.dtype().to_string(),
        });
    }
    Ok(series)
}

/// Mean of a numeric column's present values; NaN when there are none
pub fn column_mean(df: &DataFrame, column: &str) -> CleanResult<f64> {
    let series = numeric_series(df, column)?;
    Ok(series.mean().unwrap_or(f64::NAN))
}

/// Median of a numeric column's present values; NaN when there are none
pub fn column_median(df: &DataFrame, column: &str) -> CleanResult<f64> {
    let series = numeric_series(df, column)?;
    Ok(series.median().unwrap_or(f64::NAN))
}

/// Replace every missing value in a numeric column with the column mean
pub fn impute_mean(df: &DataFrame, column: &str) -> CleanResult<DataFrame> {
    let series = numeric_series(df, column)?;
    if series.null_count() == 0 {
        return Ok(df.clone());
    }
    let mean = series
        .mean()
        .ok_or_else(|| CleanError::NoValidValues(column.to_string()))?;
    replace_column(df, fill_numeric(series, mean, false)?)
}

/// Replace every missing value in a numeric column with the column median
pub fn impute_median(df: &DataFrame, column: &str) -> CleanResult<DataFrame> {
    let series = numeric_series(df, column)?;
    if series.null_count() == 0 {
        return Ok(df.clone());
    }
    let median = series
        .median()
        .ok_or_else(|| CleanError::NoValidValues(column.to_string()))?;
    replace_column(df, fill_numeric(series, median, false)?)
}

/// Replace every missing value with a fixed literal.
///
/// Numbers require a numeric column; integer columns keep their type when
/// the literal is integral. Text requires a string column.
pub fn impute_constant(df: &DataFrame, column: &str, value: &FillValue) -> CleanResult<DataFrame> {
    let series = df
        .column(column)
        .map_err(|_| CleanError::ColumnNotFound(column.to_string()))?
        .as_materialized_series();

    let filled = match value {
        FillValue::Number(n) => {
            let series = numeric_series(df, column)?;
            if series.null_count() == 0 {
                return Ok(df.clone());
            }
            fill_numeric(series, *n, true)?
        }
        FillValue::Text(text) => {
            if series.dtype() != &DataType::String {
                return Err(CleanError::TypeMismatch {
                    column: column.to_string(),
                    expected: "string",
                    actual: series.dtype().to_string(),
                });
            }
            if series.null_count() == 0 {
                return Ok(df.clone());
            }
            let filled: StringChunked = series
                .str()?
                .into_iter()
                .map(|v| Some(v.unwrap_or(text.as_str())))
                .collect();
            filled.with_name(series.name().clone()).into_series()
        }
    };

    replace_column(df, filled)
}

/// Most frequent present value of a column.
///
/// Ties go to the value encountered first in row order. Returns `None` when
/// the column has no present values.
pub fn most_frequent_value(df: &DataFrame, column: &str) -> CleanResult<Option<FillValue>> {
    let series = df
        .column(column)
        .map_err(|_| CleanError::ColumnNotFound(column.to_string()))?
        .as_materialized_series();

    if is_numeric_dtype(series.dtype()) {
        let floats = series.cast(&DataType::Float64)?;
        let values = floats.f64()?.into_iter().flatten().filter(|v| !v.is_nan());
        // -0.0 and 0.0 are the same category
        let mode = first_most_frequent(values.map(|v| (if v == 0.0 { 0.0f64 } else { v }).to_bits()));
        Ok(mode.map(|bits| FillValue::Number(f64::from_bits(bits))))
    } else if series.dtype() == &DataType::String {
        let mode = first_most_frequent(series.str()?.into_iter().flatten());
        Ok(mode.map(|s| FillValue::Text(s.to_string())))
    } else {
        Err(CleanError::TypeMismatch {
            column: column.to_string(),
            expected: "numeric or string",
            actual: series.dtype().to_string(),
        })
    }
}

fn first_most_frequent<K, I>(values: I) -> Option<K>
where
    K: std::hash::Hash + Eq + Copy,
    I: Iterator<Item = K>,
{
    let mut counts: HashMap<K, (usize, usize)> = HashMap::new();
    for (idx, value) in values.enumerate() {
        counts.entry(value).or_insert((0, idx)).0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(value, _)| value)
}

/// Replace every missing value with the column's most frequent value
pub fn impute_mode(df: &DataFrame, column: &str) -> CleanResult<DataFrame> {
    let series = df
        .column(column)
        .map_err(|_| CleanError::ColumnNotFound(column.to_string()))?;
    if series.null_count() == 0 {
        return Ok(df.clone());
    }
    let mode = most_frequent_value(df, column)?
        .ok_or_else(|| CleanError::NoValidValues(column.to_string()))?;
    impute_constant(df, column, &mode)
}

/// Apply a strategy to one column and record what was filled
pub fn apply_strategy(
    df: &DataFrame,
    column: &str,
    strategy: &ImputeStrategy,
) -> CleanResult<(DataFrame, ImputationRecord)> {
    let missing = df
        .column(column)
        .map_err(|_| CleanError::ColumnNotFound(column.to_string()))?
        .null_count();

    let fill_value = if missing == 0 {
        None
    } else {
        Some(match strategy {
            ImputeStrategy::Mean => FillValue::Number(column_mean(df, column)?),
            ImputeStrategy::Median => FillValue::Number(column_median(df, column)?),
            ImputeStrategy::Mode => most_frequent_value(df, column)?
                .ok_or_else(|| CleanError::NoValidValues(column.to_string()))?,
            ImputeStrategy::Constant { value } => value.clone(),
        })
    };

    let result = match strategy {
        ImputeStrategy::Mean => impute_mean(df, column)?,
        ImputeStrategy::Median => impute_median(df, column)?,
        ImputeStrategy::Mode => impute_mode(df, column)?,
        ImputeStrategy::Constant { value } => impute_constant(df, column, value)?,
    };

    debug!(column, strategy = strategy.label(), filled = missing, "imputation");

    Ok((
        result,
        ImputationRecord {
            column: column.to_string(),
            strategy: strategy.label().to_string(),
            fill_value,
            filled: missing,
        },
    ))
}

/// Fill nulls in a numeric series. With `keep_integer`, integer columns stay
/// integer when `fill` is integral and fits the column type; otherwise the
/// result is Float64.
fn fill_numeric(series: &Series, fill: f64, keep_integer: bool) -> CleanResult<Series> {
    let original = series.dtype().clone();
    let floats = series.cast(&DataType::Float64)?;
    let filled: Float64Chunked = floats
        .f64()?
        .into_iter()
        .map(|v| Some(v.unwrap_or(fill)))
        .collect();
    let filled = filled.with_name(series.name().clone()).into_series();

    if keep_integer && is_integer_dtype(&original) && fill.fract() == 0.0 {
        // A lossy cast would turn the fill back into nulls
        match filled.strict_cast(&original) {
            Ok(integers) => Ok(integers),
            Err(_) => {
                debug!(
                    column = %series.name(),
                    fill,
                    dtype = %original,
                    "fill value out of range, widening to Float64"
                );
                Ok(filled)
            }
        }
    } else {
        Ok(filled)
    }
}

fn replace_column(df: &DataFrame, series: Series) -> CleanResult<DataFrame> {
    let mut out = df.clone();
    out.with_column(series)?;
    Ok(out)
}
