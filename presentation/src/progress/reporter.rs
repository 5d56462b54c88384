//! Spinner shown while a turn waits on the evaluation service

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Shows a spinner for the duration of one conversation turn
pub struct ProgressReporter {
    enabled: bool,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// Reporter that never draws anything
    pub fn hidden() -> Self {
        Self { enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Start a spinner; it is cleared when the handle is finished or dropped.
    pub fn start(&self, message: &str) -> TurnSpinner {
        if !self.enabled {
            return TurnSpinner { bar: None };
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(Self::spinner_style());
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        TurnSpinner { bar: Some(bar) }
    }

    /// Await `future` behind a spinner.
    pub async fn run<F, T>(&self, message: &str, future: F) -> T
    where
        F: std::future::Future<Output = T>,
    {
        let spinner = self.start(message);
        let out = future.await;
        spinner.finish();
        out
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a running spinner
pub struct TurnSpinner {
    bar: Option<ProgressBar>,
}

impl TurnSpinner {
    pub fn is_visible(&self) -> bool {
        self.bar.is_some()
    }

    pub fn finish(mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    /// Leave a one-line failure marker in place of the spinner.
    pub fn fail(mut self, message: &str) {
        if let Some(bar) = self.bar.take() {
            bar.finish_with_message(format!("{} {}", "x".red(), message));
        }
    }
}

impl Drop for TurnSpinner {
    fn drop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}
