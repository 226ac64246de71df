//! # edgequake-web2doc
//!
//! Archive documentation pages as Markdown or PDF through a headless browser.
//!
//! ## Why a browser?
//!
//! Modern documentation sites render their content client-side. A plain HTTP
//! fetch returns an empty shell; a real browser runs the scripts, and only
//! then does the content element exist. This crate drives Chrome over the
//! DevTools protocol, waits for the content element, and either serialises it
//! to Markdown or hides the rest of the page and prints it to PDF.
//!
//! ## Pipeline Overview
//!
//! ```text
//! url_tasks.yaml
//!  │
//!  ├─ 1. Load      sections → ordered (filename, url) tasks
//!  ├─ 2. Validate  skip malformed URLs (does not use up the run cap)
//!  ├─ 3. Fetch     headless Chrome, wait for the content selector (10 s)
//!  ├─ 4. Convert   outer HTML → Markdown, or isolate + print → PDF
//!  ├─ 5. Write     atomic write to output/{filename}.{md,pdf}
//!  └─ 6. Pause     3.5–5.5 s before the next task
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_web2doc::{load_tasks, ChromeDriver, ProcessorConfig, UrlProcessor};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tasks = load_tasks("url_tasks.yaml");
//!     let config = ProcessorConfig::builder().max_tasks(None).build()?;
//!     let processor = UrlProcessor::new(tasks, config, Arc::new(ChromeDriver::new()))?;
//!     let summary = processor.process().await;
//!     eprintln!("{} converted, {} failed", summary.converted, summary.failed);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `web2doc` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! edgequake-web2doc = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod processor;
pub mod progress;
pub mod tasks;
pub mod validate;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    ConverterOptions, OutputFormat, ProcessorConfig, ProcessorConfigBuilder,
    DEFAULT_CONTENT_SELECTOR, DEFAULT_OUTPUT_DIR,
};
pub use convert::{PdfToMarkdownConverter, WebpageToMarkdownConverter, WebpageToPdfConverter};
pub use error::{TaskError, Web2DocError};
pub use output::{RunSummary, TaskOutcome, TaskReport};
pub use pipeline::browser::{BrowserDriver, ChromeDriver, PageSession, SessionOptions};
pub use pipeline::pacing::Pacing;
pub use processor::UrlProcessor;
pub use progress::{NoopProgressCallback, ProgressCallback, RunProgressCallback};
pub use tasks::{load_tasks, parse_tasks, try_load_tasks, UrlTask};
pub use validate::is_valid_url;
