//! Terminal styling utilities

use console::{style, Emoji};
use std::path::Path;

use crate::pipeline::CleaningConfig;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static ROWS: Emoji<'_, '_> = Emoji("🧮 ", "");
pub static FILL: Emoji<'_, '_> = Emoji("🩹 ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    let banner = r#"
     _   _       _ _
    | \ | |_   _| | |_____      _____  ___ _ __
    |  \| | | | | | / __\ \ /\ / / _ \/ _ \ '_ \
    | |\  | |_| | | \__ \\ V  V /  __/  __/ |_) |
    |_| \_|\__,_|_|_|___/ \_/\_/ \___|\___| .__/
                                          |_|
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {} {}",
        style("∅").magenta().bold(),
        style("Missing values, swept").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(input: &Path, output: Option<&Path>, config: &CleaningConfig) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);
    let output_text = output
        .map(|p| truncate_path(p, 38))
        .unwrap_or_else(|| "(not saved)".to_string());
    let fills = config
        .imputations
        .iter()
        .map(|i| format!("{}:{}", i.column, i.strategy.label()))
        .collect::<Vec<_>>()
        .join(", ");

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(box_width - 20)
    );
    println!("    ├{}┤", line);
    println!("    │  {} Input:  {:<39}│", FOLDER, truncate_path(input, 38));
    println!("    │  {} Output: {:<39}│", SAVE, output_text);
    println!("    ├{}┤", line);
    println!(
        "    │  {} Column threshold:      {:<24}│",
        CHART,
        style(format!(">{:.1}% missing", config.column_threshold_pct)).yellow()
    );
    println!(
        "    │  {} Row threshold:         {:<24}│",
        ROWS,
        style(format!(">{} missing", config.max_missing_per_row)).yellow()
    );
    println!(
        "    │  {} Required: {:<37}│",
        ROWS,
        truncate_string(&config.drop_rows_missing.join(", "), 36)
    );
    println!(
        "    │  {} Impute:   {:<37}│",
        FILL,
        truncate_string(&fills, 36)
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a skipped-step message
pub fn print_skipped(message: &str) {
    println!("    {} {}", style("↷").yellow().bold(), style(message).yellow());
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("nullsweep cleaning complete!").green().bold()
    );
    println!();
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, threshold_info: Option<&str>) {
    if let Some(info) = threshold_info {
        println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        );
    } else {
        println!("      Found {} {}", style(count).yellow().bold(), description);
    }
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}
