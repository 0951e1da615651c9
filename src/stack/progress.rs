use super::orchestrator::RunStatus;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Progress reporting and cooperative cancellation for a stack run
pub trait ProgressSink {
    fn start(&mut self, _total: usize) {}

    fn report_progress(&mut self, current: usize, total: usize);

    /// Polled by the orchestrator before and after each layer import
    fn is_cancelled(&self) -> bool;

    fn show_failure(&mut self, message: &str);

    fn finish(&mut self, _status: RunStatus) {}
}

/// Shared cancellation flag; clones observe the same flag
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Terminal progress bar
///
/// Cancellation is requested through [`ConsoleProgress::cancel_token`] or by
/// creating the optional stop file while the run is in progress. Failures are
/// printed here and nowhere else.
pub struct ConsoleProgress {
    bar: ProgressBar,
    token: CancelToken,
    stop_file: Option<PathBuf>,
}

impl ConsoleProgress {
    pub fn new(stop_file: Option<PathBuf>) -> Self {
        Self {
            bar: ProgressBar::new(0),
            token: CancelToken::new(),
            stop_file,
        }
    }

    /// A sink that tracks progress without drawing anything
    pub fn hidden(stop_file: Option<PathBuf>) -> Self {
        Self {
            bar: ProgressBar::hidden(),
            token: CancelToken::new(),
            stop_file,
        }
    }

    /// Handle that cancels this run from another thread
    pub fn cancel_token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl ProgressSink for ConsoleProgress {
    fn start(&mut self, total: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.green} Importing layers [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
        self.bar.set_style(style);
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
    }

    fn report_progress(&mut self, current: usize, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(current as u64);
    }

    fn is_cancelled(&self) -> bool {
        self.token.is_cancelled() || self.stop_file.as_ref().is_some_and(|p| p.exists())
    }

    fn show_failure(&mut self, message: &str) {
        self.bar.abandon_with_message("failed");
        eprintln!("Failed:\n{message}");
    }

    fn finish(&mut self, status: RunStatus) {
        match status {
            RunStatus::Completed => self.bar.finish_with_message("done"),
            RunStatus::Cancelled => self.bar.abandon_with_message("cancelled"),
            _ => {}
        }
    }
}
