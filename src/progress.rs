//! Progress-callback trait for per-task pipeline events.
//!
//! Inject an [`Arc<dyn RunProgressCallback>`] via
//! [`crate::processor::UrlProcessor::with_progress`] to receive events as the
//! pipeline works through its task list. The CLI uses it to drive a terminal
//! progress bar; library callers can forward events anywhere.
//!
//! # Example
//!
//! ```rust
//! use edgequake_web2doc::{RunProgressCallback, UrlTask};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! struct CountingCallback {
//!     converted: AtomicUsize,
//! }
//!
//! impl RunProgressCallback for CountingCallback {
//!     fn on_task_converted(&self, index: usize, task: &UrlTask, _path: &std::path::Path) {
//!         self.converted.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("#{index} {} done", task.filename);
//!     }
//! }
//! ```

use crate::output::RunSummary;
use crate::tasks::UrlTask;
use std::path::Path;
use std::sync::Arc;

/// Called by the pipeline as it processes each task.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. `index` is the 0-based position in the task list.
pub trait RunProgressCallback: Send + Sync {
    /// Called once before the first task.
    fn on_run_start(&self, total_tasks: usize, max_tasks: Option<usize>) {
        let _ = (total_tasks, max_tasks);
    }

    /// Called just before a valid task is handed to its converter.
    fn on_task_start(&self, index: usize, task: &UrlTask) {
        let _ = (index, task);
    }

    /// Called when a task's output file was written.
    fn on_task_converted(&self, index: usize, task: &UrlTask, path: &Path) {
        let _ = (index, task, path);
    }

    /// Called when a task is skipped because its URL is invalid.
    fn on_task_skipped(&self, index: usize, task: &UrlTask) {
        let _ = (index, task);
    }

    /// Called when a task's conversion failed.
    fn on_task_failed(&self, index: usize, task: &UrlTask, error: &str) {
        let _ = (index, task, error);
    }

    /// Called once after the last task (or when the cap stops the run).
    fn on_run_complete(&self, summary: &RunSummary) {
        let _ = summary;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl RunProgressCallback for NoopProgressCallback {}

/// Convenience alias for the shared callback handle.
pub type ProgressCallback = Arc<dyn RunProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        let task = UrlTask {
            filename: "a".into(),
            url: "https://example.com/a".into(),
        };
        cb.on_run_start(5, Some(1));
        cb.on_task_start(0, &task);
        cb.on_task_converted(0, &task, Path::new("output/a.md"));
        cb.on_task_skipped(1, &task);
        cb.on_task_failed(2, &task, "timeout");
        cb.on_run_complete(&RunSummary::default());
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_run_start(10, None);
    }
}
