//! Progress spinner helpers using indicatif

use indicatif::{ProgressBar, ProgressStyle};

/// Create a spinner for indeterminate progress
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("    {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Finish a spinner with a success message
pub fn finish_with_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✅ {}", message));
}

/// Run `task` behind a spinner.
///
/// On success the spinner is replaced by `success`; on failure it is cleared
/// so the error is printed on a clean line.
pub fn run_with_spinner<T, E>(
    message: &str,
    success: &str,
    task: impl FnOnce() -> Result<T, E>,
) -> Result<T, E> {
    let pb = create_spinner(message);
    match task() {
        Ok(value) => {
            finish_with_success(&pb, success);
            Ok(value)
        }
        Err(e) => {
            pb.finish_and_clear();
            Err(e)
        }
    }
}
