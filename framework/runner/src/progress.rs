use crate::probe::ProbeError;
use indicatif::{ProgressBar, ProgressStyle};

/// Per-item reporting: a progress bar across the corpus plus one line per item.
pub struct ProgressReporter {
    bar: Option<ProgressBar>,
}

impl ProgressReporter {
    pub fn new(total: u64, no_progress: bool) -> Self {
        if no_progress {
            return Self { bar: None };
        }

        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} [{wide_bar:.cyan/blue}] {pos}/{len}")
                .expect("Failed to set progress style")
                .progress_chars("#>-"),
        );

        Self { bar: Some(bar) }
    }

    pub fn on_success(&self, index: usize, elapsed_sec: f64, latency_ms: f64) {
        log::info!("[{}] {:.2}s | {:.2} ms", index + 1, elapsed_sec, latency_ms);
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    pub fn on_failure(&self, index: usize, cause: &ProbeError) {
        log::error!("Failed at entry {}: {:?}", index + 1, cause);
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}
