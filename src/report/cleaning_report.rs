//! JSON cleaning report
//!
//! Documents every input column, how much of it was missing, and whether it
//! was dropped or imputed, along with the configuration that produced it.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{CleaningConfig, CleaningOutcome, ImputationRecord, MissingProfile};

/// Stage at which a column left the table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DropStage {
    Listed,
    Threshold,
}

/// One input column in the report
#[derive(Debug, Clone, Serialize)]
pub struct ColumnReportEntry {
    pub name: String,
    pub missing_count: usize,
    /// Null when the input had zero rows
    pub missing_pct: f64,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dropped_at_stage: Option<DropStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imputation: Option<ImputationRecord>,
    /// Missing cells left after cleaning; None for dropped columns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_after: Option<usize>,
}

/// Row-level accounting
#[derive(Debug, Clone, Serialize)]
pub struct RowSummary {
    pub initial: usize,
    pub dropped_sparse: usize,
    pub dropped_required: Vec<RequiredColumnDrop>,
    pub final_rows: usize,
    /// Null when the input had zero rows
    pub retained_fraction: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequiredColumnDrop {
    pub column: String,
    pub dropped: usize,
}

/// Report metadata
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub timestamp: String,
    pub nullsweep_version: String,
    pub input_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
}

/// Complete cleaning report
#[derive(Debug, Clone, Serialize)]
pub struct CleaningReport {
    pub metadata: ReportMetadata,
    pub config: CleaningConfig,
    pub rows: RowSummary,
    pub columns: Vec<ColumnReportEntry>,
}

impl CleaningReport {
    /// Build a report from the profile taken right after loading and the
    /// finished outcome.
    pub fn build(
        input_file: &Path,
        output_file: Option<&Path>,
        config: &CleaningConfig,
        initial_profile: &MissingProfile,
        outcome: &CleaningOutcome,
    ) -> Self {
        let final_profile = MissingProfile::compute(&outcome.data);

        let columns = initial_profile
            .columns
            .iter()
            .map(|column| {
                let dropped_at_stage = if outcome.listed_drops.contains(&column.name) {
                    Some(DropStage::Listed)
                } else if outcome.threshold_drops.contains(&column.name) {
                    Some(DropStage::Threshold)
                } else {
                    None
                };
                let imputation = outcome
                    .imputations
                    .iter()
                    .find(|r| r.column == column.name && r.filled > 0)
                    .cloned();
                let missing_after = final_profile.column(&column.name).map(|c| c.count);

                ColumnReportEntry {
                    name: column.name.clone(),
                    missing_count: column.count,
                    missing_pct: column.percentage,
                    status: if dropped_at_stage.is_some() {
                        "dropped".to_string()
                    } else if imputation.is_some() {
                        "imputed".to_string()
                    } else {
                        "kept".to_string()
                    },
                    dropped_at_stage,
                    imputation,
                    missing_after,
                }
            })
            .collect();

        Self {
            metadata: ReportMetadata {
                timestamp: Utc::now().to_rfc3339(),
                nullsweep_version: env!("CARGO_PKG_VERSION").to_string(),
                input_file: input_file.display().to_string(),
                output_file: output_file.map(|p| p.display().to_string()),
            },
            config: config.clone(),
            rows: RowSummary {
                initial: outcome.initial_rows,
                dropped_sparse: outcome.sparse_rows_dropped,
                dropped_required: outcome
                    .required_rows_dropped
                    .iter()
                    .map(|(column, dropped)| RequiredColumnDrop {
                        column: column.clone(),
                        dropped: *dropped,
                    })
                    .collect(),
                final_rows: outcome.data.height(),
                retained_fraction: outcome.rows_retained_fraction(),
            },
            columns,
        }
    }
}

/// Export the cleaning report to a JSON file
pub fn export_cleaning_report(report: &CleaningReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize cleaning report to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write cleaning report to {}", output_path.display()))?;

    Ok(())
}
