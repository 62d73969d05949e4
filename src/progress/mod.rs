use crate::output::file::format_size;
use crate::transfer::TransferProgress;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TRANSFER_TEMPLATE: &str =
    "{spinner:.green} {prefix:.bold} [{bar:40.cyan/blue}] {pos:>3}% {msg} ({elapsed})";
const SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";

/// Trait for progress reporting
pub trait ProgressReporter: Send + Sync {
    fn start(&self, total: u64);
    fn update(&self, progress: &TransferProgress);
    fn set_message(&self, msg: &str);
    fn finish(&self, msg: &str);
    fn abandon(&self, msg: &str);
}

/// Indicatif-based progress reporter
pub struct IndicatifProgress {
    bar: ProgressBar,
}

impl IndicatifProgress {
    /// Percent bar for a single transfer
    pub fn transfer(name: &str) -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template(TRANSFER_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        bar.set_prefix(name.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Create a spinner for indeterminate progress
    pub fn spinner() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template(SPINNER_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }
}

impl ProgressReporter for IndicatifProgress {
    fn start(&self, total: u64) {
        self.bar.set_message(format!("0B / {}", format_size(total)));
    }

    fn update(&self, progress: &TransferProgress) {
        self.bar.set_position(progress.percent as u64);
        // Byte counts are estimated from the percentage
        self.bar.set_message(format!(
            "~{} / {}",
            format_size(progress.approx_bytes),
            format_size(progress.total_bytes)
        ));
    }

    fn set_message(&self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    fn finish(&self, msg: &str) {
        self.bar.finish_with_message(msg.to_string());
    }

    fn abandon(&self, msg: &str) {
        self.bar.abandon_with_message(msg.to_string());
    }
}

/// No-op progress reporter for when progress reporting is disabled
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    fn start(&self, _total: u64) {}
    fn update(&self, _progress: &TransferProgress) {}
    fn set_message(&self, _msg: &str) {}
    fn finish(&self, _msg: &str) {}
    fn abandon(&self, _msg: &str) {}
}

/// Progress reporter factory
pub struct ProgressFactory {
    enabled: bool,
}

impl ProgressFactory {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Create a progress reporter for file transfer
    pub fn transfer(&self, name: &str) -> Box<dyn ProgressReporter> {
        if !self.enabled {
            return Box::new(NoOpProgress);
        }
        Box::new(IndicatifProgress::transfer(name))
    }

    /// Create a progress reporter for a slow remote command
    pub fn command(&self, msg: &str) -> Box<dyn ProgressReporter> {
        if !self.enabled {
            return Box::new(NoOpProgress);
        }

        let progress = IndicatifProgress::spinner();
        progress.set_message(msg);
        Box::new(progress)
    }
}
