//! Cleaning summary report generation

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{CleaningOutcome, ImputationRecord};

/// Summary of a cleaning run for terminal display
#[derive(Debug, Default)]
pub struct CleaningSummary {
    pub initial_rows: usize,
    pub initial_columns: usize,
    pub final_rows: usize,
    pub final_columns: usize,
    pub dropped_listed: Vec<String>,
    pub dropped_threshold: Vec<String>,
    pub sparse_rows_dropped: usize,
    pub required_rows_dropped: Vec<(String, usize)>,
    pub imputations: Vec<ImputationRecord>,
}

impl CleaningSummary {
    pub fn from_outcome(outcome: &CleaningOutcome) -> Self {
        let (final_rows, final_columns) = outcome.final_shape();
        Self {
            initial_rows: outcome.initial_rows,
            initial_columns: outcome.initial_columns,
            final_rows,
            final_columns,
            dropped_listed: outcome.listed_drops.clone(),
            dropped_threshold: outcome.threshold_drops.clone(),
            sparse_rows_dropped: outcome.sparse_rows_dropped,
            required_rows_dropped: outcome.required_rows_dropped.clone(),
            imputations: outcome.imputations.clone(),
        }
    }

    /// Fraction of original rows retained; NaN when there were none
    pub fn retained_fraction(&self) -> f64 {
        if self.initial_rows == 0 {
            f64::NAN
        } else {
            self.final_rows as f64 / self.initial_rows as f64
        }
    }

    fn count_cell(count: usize) -> Cell {
        Cell::new(count).fg(if count == 0 { Color::White } else { Color::Red })
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("CLEANING SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📁 Initial Shape"),
            Cell::new(format!("{} × {}", self.initial_rows, self.initial_columns)),
        ]);
        table.add_row(vec![
            Cell::new("🗑️  Columns (Listed)"),
            Self::count_cell(self.dropped_listed.len()),
        ]);
        table.add_row(vec![
            Cell::new("🗑️  Columns (Missing %)"),
            Self::count_cell(self.dropped_threshold.len()),
        ]);
        table.add_row(vec![
            Cell::new("✂️  Rows (Sparse)"),
            Self::count_cell(self.sparse_rows_dropped),
        ]);
        for (column, dropped) in &self.required_rows_dropped {
            table.add_row(vec![
                Cell::new(format!("✂️  Rows (Missing {})", column)),
                Self::count_cell(*dropped),
            ]);
        }
        let filled: usize = self.imputations.iter().map(|r| r.filled).sum();
        table.add_row(vec![
            Cell::new("🩹 Cells Imputed"),
            Cell::new(filled).fg(Color::Cyan),
        ]);
        table.add_row(vec![
            Cell::new("✅ Final Shape"),
            Cell::new(format!("{} × {}", self.final_rows, self.final_columns))
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);

        let retained = self.retained_fraction();
        let retained_text = if retained.is_nan() {
            "n/a".to_string()
        } else {
            format!("{:.1}%", retained * 100.0)
        };
        let color = if retained >= 0.8 {
            Color::Green
        } else if retained >= 0.5 {
            Color::Yellow
        } else {
            Color::Red
        };
        table.add_row(vec![
            Cell::new("📉 Rows Retained"),
            Cell::new(retained_text)
                .fg(color)
                .add_attribute(Attribute::Bold),
        ]);

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        let dropped_columns: Vec<&String> = self
            .dropped_listed
            .iter()
            .chain(self.dropped_threshold.iter())
            .collect();
        if !dropped_columns.is_empty() {
            println!();
            println!(
                "      {} {}:",
                style("Dropped Columns").yellow(),
                style(format!("({})", dropped_columns.len())).dim()
            );
            for column in dropped_columns {
                println!("        {} {}", style("•").dim(), column);
            }
        }

        let applied: Vec<&ImputationRecord> =
            self.imputations.iter().filter(|r| r.filled > 0).collect();
        if !applied.is_empty() {
            println!();
            println!(
                "      {} {}:",
                style("Imputed Columns").yellow(),
                style(format!("({})", applied.len())).dim()
            );
            for record in applied {
                let value = record
                    .fill_value
                    .as_ref()
                    .map(|v| v.to_string())
                    .unwrap_or_default();
                println!(
                    "        {} {} ← {} {} {}",
                    style("•").dim(),
                    record.column,
                    record.strategy,
                    style(value).cyan(),
                    style(format!("({} cell(s))", record.filled)).dim()
                );
            }
        }
    }
}
