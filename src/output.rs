//! Run results and output-file writing.
//!
//! Every task ends in exactly one [`TaskOutcome`]; a run ends in a
//! [`RunSummary`] that counts them. The summary is what lets a caller (or the
//! CLI's `--fail-on-error`) tell a clean run from one where every page timed
//! out, since individual failures are logged and never propagated.

use crate::error::TaskError;
use crate::tasks::UrlTask;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// What happened to one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskOutcome {
    /// The output file was written.
    Converted { path: PathBuf },
    /// The task was not attempted (invalid URL); does not count against the cap.
    Skipped { reason: TaskError },
    /// The task was attempted and failed.
    Failed { error: TaskError },
}

/// A task together with its outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskReport {
    pub task: UrlTask,
    pub outcome: TaskOutcome,
    pub duration_ms: u64,
}

/// Aggregate result of one [`crate::processor::UrlProcessor::process`] run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Tasks in the input list.
    pub total_tasks: usize,
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Tasks never reached because the per-run cap was exhausted.
    pub not_attempted: usize,
    pub total_duration_ms: u64,
    pub reports: Vec<TaskReport>,
}

impl RunSummary {
    /// Tasks that reached a converter.
    pub fn attempted(&self) -> usize {
        self.converted + self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub(crate) fn record(&mut self, report: TaskReport) {
        match report.outcome {
            TaskOutcome::Converted { .. } => self.converted += 1,
            TaskOutcome::Skipped { .. } => self.skipped += 1,
            TaskOutcome::Failed { .. } => self.failed += 1,
        }
        self.reports.push(report);
    }
}

/// Write `bytes` to `path` atomically.
///
/// The data goes to a temporary file in the same directory which is then
/// renamed over `path`, so an interrupted write never leaves a truncated
/// document behind. An existing file at `path` is replaced and its
/// permissions carried over; a new file gets mode `0644` on Unix.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), TaskError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| TaskError::io(path, e))?;
    tmp.write_all(bytes).map_err(|e| TaskError::io(path, e))?;
    tmp.flush().map_err(|e| TaskError::io(path, e))?;
    set_output_permissions(tmp.as_file(), path).map_err(|e| TaskError::io(path, e))?;
    tmp.persist(path).map_err(|e| TaskError::io(path, e.error))?;
    Ok(())
}

/// `NamedTempFile` creates files readable by the owner only.
fn set_output_permissions(file: &std::fs::File, target: &Path) -> std::io::Result<()> {
    if let Ok(meta) = std::fs::metadata(target) {
        return file.set_permissions(meta.permissions());
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o644))?;
    }
    Ok(())
}

/// Async wrapper around [`write_atomic`].
pub async fn write_atomic_async(path: PathBuf, bytes: Vec<u8>) -> Result<(), TaskError> {
    let target = path.clone();
    tokio::task::spawn_blocking(move || write_atomic(&path, &bytes))
        .await
        .map_err(|e| TaskError::io(target, format!("write task panicked: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_atomic_creates_and_overwrites() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("doc.md");

        write_atomic(&path, b"first").expect("first write");
        assert_eq!(std::fs::read(&path).expect("read"), b"first");

        write_atomic(&path, "zweite Fassung — ü".as_bytes()).expect("second write");
        assert_eq!(
            std::fs::read_to_string(&path).expect("read"),
            "zweite Fassung — ü"
        );

        let leftovers = std::fs::read_dir(dir.path()).expect("list").count();
        assert_eq!(leftovers, 1, "temporary file must not be left behind");
    }

    #[test]
    fn write_atomic_fails_for_missing_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nope").join("doc.md");
        assert!(matches!(write_atomic(&path, b"x"), Err(TaskError::Io { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn summary_counts_outcomes() {
        let task = UrlTask {
            filename: "a".into(),
            url: "https://example.com/a".into(),
        };
        let mut summary = RunSummary::default();
        summary.record(TaskReport {
            task: task.clone(),
            outcome: TaskOutcome::Converted {
                path: PathBuf::from("out/a.md"),
            },
            duration_ms: 1,
        });
        summary.record(TaskReport {
            task: task.clone(),
            outcome: TaskOutcome::Failed {
                error: TaskError::Conversion {
                    detail: "x".into(),
                },
            },
            duration_ms: 1,
        });
        summary.record(TaskReport {
            task,
            outcome: TaskOutcome::Skipped {
                reason: TaskError::InvalidUrl { url: "x".into() },
            },
            duration_ms: 0,
        });
        assert_eq!(summary.converted, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.attempted(), 2);
        assert!(summary.has_failures());
    }

    #[test]
    fn outcome_serialises_with_status_tag() {
        let json = serde_json::to_string(&TaskOutcome::Converted {
            path: PathBuf::from("out/a.md"),
        })
        .expect("serialise");
        assert!(json.contains(r#""status":"converted""#), "got: {json}");
    }

    #[cfg(unix)]
    #[test]
    fn write_atomic_uses_regular_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let fresh = dir.path().join("fresh.md");
        write_atomic(&fresh, b"x").expect("write");
        let mode = std::fs::metadata(&fresh).expect("meta").permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);

        let shared = dir.path().join("shared.md");
        std::fs::write(&shared, b"old").expect("write");
        std::fs::set_permissions(&shared, std::fs::Permissions::from_mode(0o664)).expect("chmod");
        write_atomic(&shared, b"new").expect("overwrite");
        let mode = std::fs::metadata(&shared).expect("meta").permissions().mode() & 0o777;
        assert_eq!(mode, 0o664);
    }
}
