//! Loading indicator shown while a screen's initial fetch is in flight.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Start a spinner with the given message. Call `finish_and_clear` when the fetch resolves.
pub fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
