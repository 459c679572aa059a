//! Command-line argument definitions using clap

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::pipeline::{CleaningConfig, ColumnImputation, FillValue, ImputeStrategy, LoadOptions};

/// nullsweep - Profile and clean missing values in tabular data
#[derive(Parser, Debug)]
#[command(name = "nullsweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Input file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Write the cleaned table to this path (CSV or Parquet, by extension).
    /// Nothing is written when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON configuration file. Flags below override its values.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Drop columns with more than this percentage of missing values (0-100).
    /// Default: 30
    #[arg(long, allow_negative_numbers = true, value_parser = validate_percentage)]
    pub column_threshold: Option<f64>,

    /// Drop rows with more than this many missing fields. Default: 5
    #[arg(long)]
    pub row_threshold: Option<usize>,

    /// Drop rows missing any of these columns (comma-separated, applied in order).
    /// Default: Price,Landsize
    #[arg(long, value_delimiter = ',')]
    pub drop_rows_missing: Option<Vec<String>>,

    /// Impute these columns with their mean (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub impute_mean: Vec<String>,

    /// Impute these columns with their median (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub impute_median: Vec<String>,

    /// Impute these columns with their most frequent value (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub impute_mode: Vec<String>,

    /// Impute with a fixed value, as COLUMN=VALUE (comma-separated).
    /// Numeric values fill numeric columns; anything else fills text columns.
    #[arg(long, value_delimiter = ',', value_parser = parse_constant)]
    pub impute_constant: Vec<ColumnImputation>,

    /// Columns never removed by the missing percentage threshold (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub protect: Vec<String>,

    /// Columns to drop before processing (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub drop_columns: Vec<String>,

    /// Categorical column for grouped statistics and charts
    #[arg(long, default_value = "Type")]
    pub group_by: String,

    /// Numeric column summarized in grouped statistics and charts
    #[arg(long, default_value = "Price")]
    pub value_column: String,

    /// Index columns for the pivot table (comma-separated)
    #[arg(long, value_delimiter = ',', default_value = "Type,Bathroom")]
    pub pivot_index: Vec<String>,

    /// Number of histogram bins
    #[arg(long, default_value = "30")]
    pub bins: usize,

    /// Decimal places for missing percentages
    #[arg(long, default_value = "2")]
    pub precision: u32,

    /// Field separator for CSV input
    #[arg(long, default_value = ",", value_parser = parse_separator)]
    pub separator: u8,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Skip interactive confirmation prompts
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,

    /// Skip grouped statistics, pivot table and charts
    #[arg(long, default_value = "false")]
    pub no_charts: bool,

    /// Write a JSON cleaning report next to the input
    #[arg(long, default_value = "false")]
    pub report: bool,

    /// Log level for diagnostics (RUST_LOG overrides)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the missing value profile of a file without cleaning it
    Profile {
        /// Input file path (CSV or Parquet)
        input: PathBuf,

        /// Also count rows with more than this many missing fields
        #[arg(long, default_value = "5")]
        row_threshold: usize,

        /// Decimal places for missing percentages
        #[arg(long, default_value = "2")]
        precision: u32,

        /// Field separator for CSV input
        #[arg(long, default_value = ",", value_parser = parse_separator)]
        separator: u8,

        /// Number of rows to use for schema inference (CSV only)
        #[arg(long, default_value = "10000")]
        infer_schema_length: usize,
    },
}

impl Cli {
    pub fn input(&self) -> Option<&PathBuf> {
        self.input.as_ref()
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            separator: self.separator,
            infer_schema_length: self.infer_schema_length,
        }
    }

    /// Path of the JSON cleaning report, derived from the input file.
    /// The report sits next to the input with a '_cleaning_report.json' suffix.
    pub fn report_path(&self) -> Option<PathBuf> {
        let input = self.input.as_ref()?;
        let parent = input.parent().unwrap_or_else(|| Path::new("."));
        let stem = input.file_stem().and_then(|s| s.to_str())?;
        Some(parent.join(format!("{}_cleaning_report.json", stem)))
    }

    /// Build the effective configuration: defaults, then the config file,
    /// then explicit flags.
    pub fn cleaning_config(&self) -> Result<CleaningConfig> {
        let base = match &self.config {
            Some(path) => CleaningConfig::from_json_file(path)?,
            None => CleaningConfig::default(),
        };
        let config = self.apply_overrides(base);
        config
            .validate()
            .context("Invalid cleaning configuration")?;
        Ok(config)
    }

    /// Layer explicit flags on top of `config`.
    ///
    /// Imputation flags replace the strategy of the named columns and append
    /// columns not yet planned.
    pub fn apply_overrides(&self, mut config: CleaningConfig) -> CleaningConfig {
        if let Some(threshold) = self.column_threshold {
            config.column_threshold_pct = threshold;
        }
        if let Some(max_missing) = self.row_threshold {
            config.max_missing_per_row = max_missing;
        }
        if let Some(columns) = &self.drop_rows_missing {
            config.drop_rows_missing = columns.clone();
        }
        if !self.drop_columns.is_empty() {
            config.drop_columns = self.drop_columns.clone();
        }
        if !self.protect.is_empty() {
            config.protected_columns = self.protect.clone();
        }

        let flagged = self
            .impute_mean
            .iter()
            .map(|c| ColumnImputation::new(c.as_str(), ImputeStrategy::Mean))
            .chain(
                self.impute_median
                    .iter()
                    .map(|c| ColumnImputation::new(c.as_str(), ImputeStrategy::Median)),
            )
            .chain(
                self.impute_mode
                    .iter()
                    .map(|c| ColumnImputation::new(c.as_str(), ImputeStrategy::Mode)),
            )
            .chain(self.impute_constant.iter().cloned());

        for imputation in flagged {
            match config
                .imputations
                .iter_mut()
                .find(|existing| existing.column == imputation.column)
            {
                Some(existing) => existing.strategy = imputation.strategy,
                None => config.imputations.push(imputation),
            }
        }

        config
    }
}

/// Validator for percentage thresholds; -1 is allowed and drops every column
fn validate_percentage(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(-1.0..=100.0).contains(&value) {
        Err(format!(
            "column threshold must be between -1 and 100, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}

/// Parser for single-byte field separators
fn parse_separator(s: &str) -> Result<u8, String> {
    let s = if s == "\\t" { "\t" } else { s };
    match s.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(format!("separator must be a single ASCII character, got '{}'", s)),
    }
}

/// Parser for COLUMN=VALUE constant imputations
fn parse_constant(s: &str) -> Result<ColumnImputation, String> {
    let (column, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=VALUE, got '{}'", s))?;
    let column = column.trim();
    if column.is_empty() {
        return Err(format!("missing column name in '{}'", s));
    }
    let value = match value.trim().parse::<f64>() {
        Ok(n) => FillValue::Number(n),
        Err(_) => FillValue::Text(value.to_string()),
    };
    Ok(ColumnImputation::new(
        column,
        ImputeStrategy::Constant { value },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_separator() {
        assert_eq!(parse_separator(",").unwrap(), b',');
        assert_eq!(parse_separator("\\t").unwrap(), b'\t');
        assert!(parse_separator(";;").is_err());
    }

    #[test]
    fn test_parse_constant() {
        let parsed = parse_constant("Car=2").unwrap();
        assert_eq!(parsed.column, "Car");
        assert_eq!(
            parsed.strategy,
            ImputeStrategy::Constant {
                value: FillValue::Number(2.0)
            }
        );

        let parsed = parse_constant("Type=h").unwrap();
        assert_eq!(
            parsed.strategy,
            ImputeStrategy::Constant {
                value: FillValue::Text("h".to_string())
            }
        );

        assert!(parse_constant("Car").is_err());
        assert!(parse_constant("=2").is_err());
    }

    #[test]
    fn test_validate_percentage() {
        assert_eq!(validate_percentage("30").unwrap(), 30.0);
        assert_eq!(validate_percentage("-1").unwrap(), -1.0);
        assert!(validate_percentage("101").is_err());
        assert!(validate_percentage("abc").is_err());
    }
}
