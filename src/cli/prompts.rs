//! Interactive prompts using dialoguer

use anyhow::Result;
use dialoguer::Confirm;

/// Prompt user to confirm proceeding with an action
pub fn confirm_step(message: &str) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(true)
        .interact()?;
    Ok(confirmed)
}

/// Prompt user to confirm dropping columns
pub fn confirm_drop_columns(column_count: usize, reason: &str) -> Result<bool> {
    let message = format!("Drop {} column(s) with {}?", column_count, reason);
    confirm_step(&message)
}

/// Prompt user to confirm dropping rows
pub fn confirm_drop_rows(row_count: usize, reason: &str) -> Result<bool> {
    let message = format!("Drop {} row(s) with {}?", row_count, reason);
    confirm_step(&message)
}
