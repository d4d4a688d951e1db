//! Progress spinner for requests to the upstream catalog.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// A single spinner shown while a blocking step runs.
///
/// When `quiet` is true the spinner is hidden but still accepts messages,
/// so callers never need to branch on verbosity.
pub(crate) struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    pub(crate) fn start(msg: impl Into<String>, quiet: bool) -> Self {
        let pb = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::with_template("  {spinner:.cyan} {msg}") {
                pb.set_style(style.tick_chars("/-\\|"));
            }
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        };
        pb.set_message(msg.into());
        Self { pb }
    }

    /// Remove the spinner line.
    pub(crate) fn finish(self) {
        self.pb.finish_and_clear();
    }
}
