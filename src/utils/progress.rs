//! Scan progress reporting; a no-op when the `progress` feature is disabled
//! or when output is silenced.

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};
#[cfg(feature = "progress")]
use std::time::Duration;

/// Spinner while discovering files, then a bar while reading them
#[derive(Clone, Default)]
pub struct ScanProgress {
    #[cfg(feature = "progress")]
    bar: Option<ProgressBar>,
}

impl ScanProgress {
    pub fn hidden() -> Self {
        Self::default()
    }

    #[cfg(feature = "progress")]
    pub fn spinner(message: &'static str) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(message);
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar: Some(bar) }
    }

    #[cfg(feature = "progress")]
    pub fn bar(len: u64, message: &'static str) -> Self {
        let bar = ProgressBar::new(len);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        {
            bar.set_style(style.progress_chars("█▓▒░  "));
        }
        bar.set_message(message);
        Self { bar: Some(bar) }
    }

    #[cfg(not(feature = "progress"))]
    pub fn spinner(_message: &'static str) -> Self {
        Self::default()
    }

    #[cfg(not(feature = "progress"))]
    pub fn bar(_len: u64, _message: &'static str) -> Self {
        Self::default()
    }

    pub fn inc(&self) {
        #[cfg(feature = "progress")]
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    pub fn finish(&self, message: String) {
        #[cfg(feature = "progress")]
        if let Some(bar) = &self.bar {
            bar.finish_with_message(message);
        }
        #[cfg(not(feature = "progress"))]
        let _ = message;
    }
}
