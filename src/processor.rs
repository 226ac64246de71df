//! The task pipeline: validate, convert, pause, repeat.
//!
//! ```text
//! tasks ──▶ validate ──▶ converter (md | pdf) ──▶ pause ──▶ next task
//!              │ invalid                              │
//!              └──▶ skip (cap untouched)              └─ cap − 1
//! ```
//!
//! Tasks run strictly one after another. A failed task is logged and
//! recorded; the run always continues with the next task until the list is
//! exhausted or the per-run cap reaches zero.

use crate::config::{OutputFormat, ProcessorConfig};
use crate::convert::{WebpageToMarkdownConverter, WebpageToPdfConverter};
use crate::error::{TaskError, Web2DocError};
use crate::output::{RunSummary, TaskOutcome, TaskReport};
use crate::pipeline::browser::BrowserDriver;
use crate::progress::ProgressCallback;
use crate::tasks::UrlTask;
use crate::validate::is_valid_url;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Runs a task list through one converter per task.
pub struct UrlProcessor {
    tasks: Vec<UrlTask>,
    config: ProcessorConfig,
    markdown: WebpageToMarkdownConverter,
    pdf: WebpageToPdfConverter,
    progress: Option<ProgressCallback>,
}

impl UrlProcessor {
    /// Create a processor and its output directory.
    ///
    /// The directory (and any missing parents) is created eagerly; an
    /// existing directory is fine.
    pub fn new(
        tasks: Vec<UrlTask>,
        config: ProcessorConfig,
        driver: Arc<dyn BrowserDriver>,
    ) -> Result<Self, Web2DocError> {
        std::fs::create_dir_all(&config.output_dir).map_err(|e| Web2DocError::OutputDirFailed {
            path: config.output_dir.clone(),
            source: e,
        })?;

        let options = config.converter_options();
        Ok(Self {
            tasks,
            markdown: WebpageToMarkdownConverter::new(Arc::clone(&driver), options.clone()),
            pdf: WebpageToPdfConverter::new(driver, options),
            config,
            progress: None,
        })
    }

    /// Attach a progress callback.
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn tasks(&self) -> &[UrlTask] {
        &self.tasks
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Output path for a task under the configured directory and format.
    pub fn output_path(&self, task: &UrlTask) -> PathBuf {
        self.config
            .output_dir
            .join(format!("{}.{}", task.filename, self.config.format.extension()))
    }

    /// Process tasks in order until the list or the cap runs out.
    ///
    /// Never fails: every per-task problem ends up in the returned summary.
    pub async fn process(&self) -> RunSummary {
        let run_start = Instant::now();
        let mut summary = RunSummary {
            total_tasks: self.tasks.len(),
            ..Default::default()
        };
        let mut remaining = self.config.max_tasks;

        if let Some(ref cb) = self.progress {
            cb.on_run_start(self.tasks.len(), self.config.max_tasks);
        }

        for (index, task) in self.tasks.iter().enumerate() {
            if remaining == Some(0) {
                info!("Max limit reached");
                summary.not_attempted = self.tasks.len() - index;
                break;
            }

            if !is_valid_url(&task.url) {
                warn!("Invalid URL skipped: {}", task.url);
                if let Some(ref cb) = self.progress {
                    cb.on_task_skipped(index, task);
                }
                summary.record(TaskReport {
                    task: task.clone(),
                    outcome: TaskOutcome::Skipped {
                        reason: TaskError::InvalidUrl {
                            url: task.url.clone(),
                        },
                    },
                    duration_ms: 0,
                });
                continue;
            }

            info!("executing url task: {} @ {}", task.filename, task.url);
            if let Some(ref cb) = self.progress {
                cb.on_task_start(index, task);
            }

            let task_start = Instant::now();
            let outcome = match self.run_task(task).await {
                Ok(path) => {
                    if let Some(ref cb) = self.progress {
                        cb.on_task_converted(index, task, &path);
                    }
                    TaskOutcome::Converted { path }
                }
                Err(error) => {
                    if let Some(ref cb) = self.progress {
                        cb.on_task_failed(index, task, &error.to_string());
                    }
                    TaskOutcome::Failed { error }
                }
            };
            summary.record(TaskReport {
                task: task.clone(),
                outcome,
                duration_ms: task_start.elapsed().as_millis() as u64,
            });

            self.config.pacing.pause().await;

            remaining = remaining.map(|n| n - 1);
        }

        summary.total_duration_ms = run_start.elapsed().as_millis() as u64;
        info!(
            "Run complete: {} converted, {} failed, {} skipped, {} not attempted",
            summary.converted, summary.failed, summary.skipped, summary.not_attempted
        );

        if let Some(ref cb) = self.progress {
            cb.on_run_complete(&summary);
        }

        summary
    }

    async fn run_task(&self, task: &UrlTask) -> Result<PathBuf, TaskError> {
        let path = self.output_path(task);
        let selector = &self.config.content_selector;
        match self.config.format {
            OutputFormat::Markdown => self.markdown.convert(&task.url, &path, selector).await,
            OutputFormat::Pdf => self.pdf.convert(&task.url, &path, selector).await,
        }
    }
}
