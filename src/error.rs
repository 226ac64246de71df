//! Error types for the edgequake-web2doc library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Web2DocError`] — **Fatal** for the operation that returns it: the task
//!   file cannot be read, the output directory cannot be created, the
//!   configuration is invalid. Returned as `Err(Web2DocError)` from
//!   constructors and loaders.
//!
//! * [`TaskError`] — **Non-fatal**: a single task failed (navigation timeout,
//!   missing element, write failure) but the remaining tasks are unaffected.
//!   Stored inside [`crate::output::TaskOutcome`] so a run reports every
//!   failure instead of aborting on the first one.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors returned by the edgequake-web2doc library.
///
/// Per-task failures use [`TaskError`] and are recorded in
/// [`crate::output::RunSummary`] rather than propagated here.
#[derive(Debug, Error)]
pub enum Web2DocError {
    // ── Task file errors ──────────────────────────────────────────────────
    /// The task file could not be read or does not have the expected shape.
    #[error("Failed to load task file '{path}': {detail}")]
    ConfigLoad { path: PathBuf, detail: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The output directory could not be created.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Place libpdfium next to the binary, install it system-wide, or set\n\
PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n"
    )]
    PdfiumBindingFailed(String),
}

/// A non-fatal error for a single task.
///
/// Converters return it after logging; the pipeline stores it and moves on.
#[derive(Debug, Clone, Error, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum TaskError {
    /// The task URL failed validation and was never fetched.
    #[error("Invalid URL: '{url}'")]
    InvalidUrl { url: String },

    /// The browser process could not be started.
    #[error("Failed to launch browser: {detail}")]
    BrowserLaunch { detail: String },

    /// Navigation to the page failed.
    #[error("Failed to navigate to '{url}': {detail}")]
    Navigation { url: String, detail: String },

    /// The content element did not appear in time.
    #[error("Timed out after {secs}s waiting for '{selector}'")]
    Timeout { selector: String, secs: u64 },

    /// The content element could not be read from the page.
    #[error("Element '{selector}' not found: {detail}")]
    ElementNotFound { selector: String, detail: String },

    /// An injected script or a protocol command failed.
    #[error("Browser script failed: {detail}")]
    Script { detail: String },

    /// The fetched content could not be turned into the output document.
    #[error("Conversion failed: {detail}")]
    Conversion { detail: String },

    /// Conversion produced nothing worth writing.
    #[error("Converted document for '{source_name}' is empty")]
    EmptyContent { source_name: String },

    /// Reading an input file or writing an output file failed.
    #[error("I/O error on '{path}': {detail}")]
    Io { path: PathBuf, detail: String },
}

impl TaskError {
    pub(crate) fn io(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        TaskError::Io {
            path: path.into(),
            detail: err.to_string(),
        }
    }

    /// `true` for failures that happened while talking to the browser.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            TaskError::BrowserLaunch { .. }
                | TaskError::Navigation { .. }
                | TaskError::Timeout { .. }
                | TaskError::ElementNotFound { .. }
                | TaskError::Script { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_load_display() {
        let e = Web2DocError::ConfigLoad {
            path: PathBuf::from("url_tasks.yaml"),
            detail: "missing field `base_url`".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("url_tasks.yaml"), "got: {msg}");
        assert!(msg.contains("base_url"), "got: {msg}");
    }

    #[test]
    fn timeout_display() {
        let e = TaskError::Timeout {
            selector: "#main".into(),
            secs: 10,
        };
        assert!(e.to_string().contains("10s"));
        assert!(e.to_string().contains("#main"));
    }

    #[test]
    fn fetch_error_classification() {
        assert!(TaskError::Timeout {
            selector: "x".into(),
            secs: 1
        }
        .is_fetch_error());
        assert!(!TaskError::Conversion {
            detail: "bad".into()
        }
        .is_fetch_error());
        assert!(!TaskError::io("out.md", "disk full").is_fetch_error());
    }

    #[test]
    fn task_error_serialises() {
        let e = TaskError::InvalidUrl {
            url: "not a url".into(),
        };
        let json = serde_json::to_string(&e).expect("serialise");
        assert!(json.contains("InvalidUrl"));
    }
}
