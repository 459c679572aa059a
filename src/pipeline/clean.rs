//! Cleaning pipeline orchestration
//!
//! `CleaningRun` exposes each stage separately so the CLI can preview and
//! confirm a step before applying it. `clean_housing_data` runs every stage
//! in order with no interaction and no printing.

use polars::prelude::*;
use tracing::info;

use super::config::CleaningConfig;
use super::error::CleanResult;
use super::impute::{apply_strategy, ImputationRecord};
use super::missing::{rows_with_missing_above, MissingProfile};
use super::prune::{
    columns_above_threshold, drop_columns, drop_rows_with_missing_count_above,
    drop_rows_with_missing_in,
};

/// Result of a cleaning run: the cleaned table and a record of every change
#[derive(Debug, Clone)]
pub struct CleaningOutcome {
    pub data: DataFrame,
    pub initial_rows: usize,
    pub initial_columns: usize,
    /// Columns removed because the configuration listed them
    pub listed_drops: Vec<String>,
    /// Columns removed by the missing percentage threshold
    pub threshold_drops: Vec<String>,
    /// Rows removed for having too many missing fields
    pub sparse_rows_dropped: usize,
    /// Rows removed for missing a required column, per column in order
    pub required_rows_dropped: Vec<(String, usize)>,
    pub imputations: Vec<ImputationRecord>,
}

impl CleaningOutcome {
    /// Fraction of original rows still present; NaN when the input was empty
    pub fn rows_retained_fraction(&self) -> f64 {
        if self.initial_rows == 0 {
            f64::NAN
        } else {
            self.data.height() as f64 / self.initial_rows as f64
        }
    }

    pub fn final_shape(&self) -> (usize, usize) {
        self.data.shape()
    }
}

/// A cleaning run in progress
pub struct CleaningRun<'a> {
    config: &'a CleaningConfig,
    outcome: CleaningOutcome,
}

impl<'a> CleaningRun<'a> {
    pub fn new(data: DataFrame, config: &'a CleaningConfig) -> Self {
        let (initial_rows, initial_columns) = data.shape();
        Self {
            config,
            outcome: CleaningOutcome {
                data,
                initial_rows,
                initial_columns,
                listed_drops: Vec::new(),
                threshold_drops: Vec::new(),
                sparse_rows_dropped: 0,
                required_rows_dropped: Vec::new(),
                imputations: Vec::new(),
            },
        }
    }

    pub fn data(&self) -> &DataFrame {
        &self.outcome.data
    }

    pub fn config(&self) -> &CleaningConfig {
        self.config
    }

    /// Drop the columns the configuration names explicitly
    pub fn drop_listed_columns(&mut self) -> CleanResult<()> {
        if self.config.drop_columns.is_empty() {
            return Ok(());
        }
        self.outcome.data = drop_columns(&self.outcome.data, &self.config.drop_columns)?;
        self.outcome.listed_drops = self.config.drop_columns.clone();
        info!(columns = ?self.config.drop_columns, "dropped listed columns");
        Ok(())
    }

    /// Columns the threshold stage would remove from the current table
    pub fn planned_column_drops(&self) -> Vec<String> {
        let profile = MissingProfile::compute(&self.outcome.data);
        columns_above_threshold(
            &profile,
            self.config.column_threshold_pct,
            &self.config.protected_columns,
        )
    }

    /// Drop the given columns as the threshold stage
    pub fn drop_threshold_columns(&mut self, names: Vec<String>) -> CleanResult<()> {
        self.outcome.data = drop_columns(&self.outcome.data, &names)?;
        info!(
            threshold_pct = self.config.column_threshold_pct,
            columns = ?names,
            "dropped sparse columns"
        );
        self.outcome.threshold_drops.extend(names);
        Ok(())
    }

    /// Rows the sparse-row stage would remove from the current table
    pub fn planned_sparse_row_drops(&self) -> usize {
        rows_with_missing_above(&self.outcome.data, self.config.max_missing_per_row)
    }

    /// Remove rows with more than `max_missing_per_row` missing fields
    pub fn prune_sparse_rows(&mut self) -> CleanResult<usize> {
        let before = self.outcome.data.height();
        self.outcome.data =
            drop_rows_with_missing_count_above(&self.outcome.data, self.config.max_missing_per_row)?;
        let dropped = before - self.outcome.data.height();
        self.outcome.sparse_rows_dropped += dropped;
        info!(
            max_missing = self.config.max_missing_per_row,
            dropped, "dropped sparse rows"
        );
        Ok(dropped)
    }

    /// Remove rows missing any required column, one column at a time so
    /// each column's effect is recorded. Repeated names are applied once.
    pub fn prune_rows_missing_required(&mut self) -> CleanResult<&[(String, usize)]> {
        let config = self.config;
        let start = self.outcome.required_rows_dropped.len();
        let mut applied: Vec<&str> = Vec::new();

        for column in &config.drop_rows_missing {
            if applied.contains(&column.as_str()) {
                continue;
            }
            applied.push(column);

            let before = self.outcome.data.height();
            self.outcome.data = drop_rows_with_missing_in(&self.outcome.data, &[column])?;
            let dropped = before - self.outcome.data.height();
            info!(column = %column, dropped, "dropped rows missing required column");
            self.outcome
                .required_rows_dropped
                .push((column.clone(), dropped));
        }

        Ok(&self.outcome.required_rows_dropped[start..])
    }

    /// Apply every configured imputation in order
    pub fn impute(&mut self) -> CleanResult<&[ImputationRecord]> {
        let config = self.config;
        let start = self.outcome.imputations.len();
        for imputation in &config.imputations {
            let (data, record) =
                apply_strategy(&self.outcome.data, &imputation.column, &imputation.strategy)?;
            self.outcome.data = data;
            if record.filled > 0 {
                info!(
                    column = %record.column,
                    strategy = %record.strategy,
                    filled = record.filled,
                    "imputed missing values"
                );
            }
            self.outcome.imputations.push(record);
        }
        Ok(&self.outcome.imputations[start..])
    }

    pub fn finish(self) -> CleaningOutcome {
        self.outcome
    }
}

/// Run every cleaning stage in order: listed column drops, threshold column
/// pruning, sparse row pruning, required-column row pruning, imputation.
pub fn clean_housing_data(df: DataFrame, config: &CleaningConfig) -> CleanResult<CleaningOutcome> {
    config.validate()?;

    let mut run = CleaningRun::new(df, config);
    run.drop_listed_columns()?;
    let planned = run.planned_column_drops();
    run.drop_threshold_columns(planned)?;
    run.prune_sparse_rows()?;
    run.prune_rows_missing_required()?;
    run.impute()?;

    Ok(run.finish())
}
