//! nullsweep: Missing Value Cleaning CLI Tool
//!
//! A command-line tool for profiling and cleaning missing values in
//! tabular datasets with column/row pruning and imputation.

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use console::style;
use polars::prelude::DataFrame;

use nullsweep::cli::{confirm_drop_columns, confirm_drop_rows, Cli, Commands};
use nullsweep::pipeline::{
    is_numeric_dtype, load_dataset, save_dataset, CleaningRun, LoadOptions, MissingProfile,
};
use nullsweep::report::{
    dataframe_table, describe_columns, export_cleaning_report, group_stats, pivot_mean,
    print_box_plot, print_category_bar_chart, print_grouped_box_plot, print_histogram,
    print_missing_table, print_titled_table, value_counts, CleaningReport, CleaningSummary,
};
use nullsweep::utils::{
    print_banner, print_completion, print_config, print_count, print_info, print_skipped,
    print_step_header, print_success, run_with_spinner,
};

/// Rows shown per value-count table
const VALUE_COUNT_ROWS: usize = 10;

/// Initialize the tracing subscriber for diagnostic logs
fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    // Handle subcommands
    if let Some(command) = &cli.command {
        return match command {
            Commands::Profile {
                input,
                row_threshold,
                precision,
                separator,
                infer_schema_length,
            } => run_profile(
                input,
                &LoadOptions {
                    separator: *separator,
                    infer_schema_length: *infer_schema_length,
                },
                *row_threshold,
                *precision,
            ),
        };
    }

    // Main cleaning pipeline - require input
    let input = cli.input().ok_or_else(|| {
        anyhow::anyhow!("Input file is required. Use -i/--input to specify a file.")
    })?;
    let config = cli.cleaning_config()?;

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(input, cli.output.as_deref(), &config);

    // Step 1: Load dataset
    print_step_header(1, "Load Dataset");
    let df = run_with_spinner("Reading dataset...", "Dataset loaded", || {
        load_dataset(input, &cli.load_options())
    })?;
    let (rows, cols) = df.shape();
    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);

    // Step 2: Missing value profile
    print_step_header(2, "Missing Value Profile");
    let initial_profile = MissingProfile::compute(&df);
    print_profile(&initial_profile, &df, config.max_missing_per_row, cli.precision);

    let mut run = CleaningRun::new(df, &config);

    // Step 3: Column pruning
    print_step_header(3, "Column Pruning");
    if !config.drop_columns.is_empty() {
        run.drop_listed_columns()?;
        print_success(&format!(
            "Dropped listed column(s): {}",
            config.drop_columns.join(", ")
        ));
    }

    let planned = run.planned_column_drops();
    if planned.is_empty() {
        print_info("No columns exceed the missing value threshold");
    } else {
        let reason = format!(">{:.1}% missing", config.column_threshold_pct);
        print_count("column(s) with high missing values", planned.len(), Some(&format!("({})", reason)));
        for column in &planned {
            println!("        {} {}", style("•").dim(), column);
        }
        if cli.no_confirm || confirm_drop_columns(planned.len(), &reason)? {
            run.drop_threshold_columns(planned)?;
            print_success("Dropped columns with high missing values");
            print_missing_table(&MissingProfile::compute(run.data()), cli.precision);
        } else {
            print_skipped("Kept all columns");
        }
    }

    // Step 4: Row pruning
    print_step_header(4, "Row Pruning");
    let sparse = run.planned_sparse_row_drops();
    if sparse == 0 {
        print_info("No rows exceed the missing field threshold");
    } else {
        let reason = format!(">{} missing fields", config.max_missing_per_row);
        print_count("row(s) with many missing fields", sparse, Some(&format!("({})", reason)));
        if cli.no_confirm || confirm_drop_rows(sparse, &reason)? {
            run.prune_sparse_rows()?;
            print_success("Dropped sparse rows");
        } else {
            print_skipped("Kept sparse rows");
        }
    }

    for (column, dropped) in run.prune_rows_missing_required()? {
        if *dropped == 0 {
            print_info(&format!("No rows missing '{}'", column));
        } else {
            print_success(&format!("Dropped {} row(s) missing '{}'", dropped, column));
        }
    }

    // Step 5: Imputation
    print_step_header(5, "Imputation");
    let targets: Vec<&str> = config
        .imputations
        .iter()
        .map(|imputation| imputation.column.as_str())
        .filter(|name| run.data().column(name).is_ok())
        .collect();
    print_column_stats(run.data(), &targets, &targets)?;
    let records = run_with_spinner("Imputing missing values...", "Imputation complete", || {
        run.impute().map(|records| records.to_vec())
    })?;
    for record in &records {
        match &record.fill_value {
            Some(value) => println!(
                "      {} {} ← {} {}",
                style("•").dim(),
                record.column,
                record.strategy,
                style(value).cyan()
            ),
            None => println!(
                "      {} {} {}",
                style("•").dim(),
                record.column,
                style("(nothing missing)").dim()
            ),
        }
    }

    let outcome = run.finish();

    // Step 6: Report
    print_step_header(6, "Report");
    CleaningSummary::from_outcome(&outcome).display();
    print_missing_table(&MissingProfile::compute(&outcome.data), cli.precision);

    if !cli.no_charts {
        print_views(&outcome.data, &cli)?;
    }

    if let Some(output_path) = &cli.output {
        let mut data = outcome.data.clone();
        run_with_spinner(
            "Writing output file...",
            &format!("Saved to {}", output_path.display()),
            || save_dataset(&mut data, output_path),
        )?;
    }

    if cli.report {
        if let Some(report_path) = cli.report_path() {
            let report = CleaningReport::build(
                input,
                cli.output.as_deref(),
                &config,
                &initial_profile,
                &outcome,
            );
            export_cleaning_report(&report, &report_path)?;
            print_success(&format!("Report written to {}", report_path.display()));
        }
    }

    print_completion();

    Ok(())
}

/// Print the missing value table plus row-level counts
fn print_profile(profile: &MissingProfile, df: &DataFrame, max_missing: usize, precision: u32) {
    print_missing_table(profile, precision);
    println!();
    println!(
        "      Rows with any missing value: {}",
        style(profile.rows_with_any_missing()).yellow()
    );
    println!(
        "      Rows with all values missing: {}",
        style(profile.rows_with_all_missing()).yellow()
    );
    let above = profile.row_counts.iter().filter(|&&n| n > max_missing).count();
    let pct = if df.height() == 0 {
        f64::NAN
    } else {
        100.0 * above as f64 / df.height() as f64
    };
    println!(
        "      Rows with more than {} missing: {} {}",
        max_missing,
        style(above).yellow(),
        style(format!("({:.1}%)", pct)).dim()
    );
}

/// Grouped statistics, pivot table and charts over the cleaned table
fn print_views(df: &DataFrame, cli: &Cli) -> Result<()> {
    let has = |name: &str| df.column(name).is_ok();

    if !has(cli.value_column.as_str()) {
        print_info(&format!(
            "Column '{}' not in cleaned data; skipping charts",
            cli.value_column
        ));
        return Ok(());
    }

    print_histogram(df, &cli.value_column, cli.bins)?;
    print_box_plot(df, &cli.value_column)?;

    if has(cli.group_by.as_str()) {
        let stats = group_stats(df, &cli.group_by, &cli.value_column)?;
        print_titled_table(
            &format!("{} by {}", cli.value_column, cli.group_by),
            &dataframe_table(&stats, 50),
        );
        print_grouped_box_plot(df, &cli.value_column, &cli.group_by)?;
        print_category_bar_chart(df, &cli.value_column, &cli.group_by)?;
    } else {
        print_info(&format!(
            "Column '{}' not in cleaned data; skipping grouped views",
            cli.group_by
        ));
    }

    if cli.pivot_index.iter().all(|name| has(name.as_str())) {
        let pivot = pivot_mean(df, &cli.pivot_index)?;
        print_titled_table(
            &format!("Pivot (mean) by {}", cli.pivot_index.join(", ")),
            &dataframe_table(&pivot, 50),
        );
    } else {
        print_info("Pivot index columns not in cleaned data; skipping pivot table");
    }

    Ok(())
}

/// Describe the numeric columns among `described`, then list the most
/// frequent values of each column in `counted`
fn print_column_stats(df: &DataFrame, described: &[&str], counted: &[&str]) -> Result<()> {
    let numeric: Vec<&str> = described
        .iter()
        .copied()
        .filter(|name| df.column(name).is_ok_and(|c| is_numeric_dtype(c.dtype())))
        .collect();
    if !numeric.is_empty() {
        let stats = describe_columns(df, &numeric)?;
        print_titled_table("Summary statistics", &dataframe_table(&stats, stats.height()));
    }

    for name in counted {
        let counts = value_counts(df, name)?;
        let title = if counts.height() > VALUE_COUNT_ROWS {
            format!("{} values (top {} of {})", name, VALUE_COUNT_ROWS, counts.height())
        } else {
            format!("{} values", name)
        };
        print_titled_table(&title, &dataframe_table(&counts, VALUE_COUNT_ROWS));
    }
    Ok(())
}

/// Load a file and print its missing value profile without cleaning
fn run_profile(input: &Path, options: &LoadOptions, row_threshold: usize, precision: u32) -> Result<()> {
    println!(
        "\n {} Missing value profile",
        style("◆").cyan().bold()
    );
    println!("   Input: {}", style(input.display()).dim());

    let df = run_with_spinner("Reading dataset...", "Dataset loaded", || {
        load_dataset(input, options)
    })?;
    let (rows, cols) = df.shape();
    println!("      {} rows × {} columns", rows, cols);

    let profile = MissingProfile::compute(&df);
    print_profile(&profile, &df, row_threshold, precision);
    println!();
    println!(
        "      Total missing cells: {}",
        style(profile.total_missing()).yellow().bold()
    );

    let text: Vec<&str> = df
        .get_columns()
        .iter()
        .filter(|c| !is_numeric_dtype(c.dtype()))
        .map(|c| c.name().as_str())
        .collect();
    let all: Vec<&str> = df.get_columns().iter().map(|c| c.name().as_str()).collect();
    print_column_stats(&df, &all, &text)?;

    Ok(())
}
