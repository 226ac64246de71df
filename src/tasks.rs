//! Task file loading: YAML sections → ordered [`UrlTask`] list.
//!
//! The task file maps a section name to a base URL and a list of path
//! suffixes:
//!
//! ```yaml
//! guides:
//!   base_url: https://docs.example.com/
//!   urls:
//!     - getting-started
//!     - reference/cli
//! ```
//!
//! produces `guides_getting-started` → `https://docs.example.com/getting-started`
//! and `guides_reference_cli` → `https://docs.example.com/reference/cli`.
//! Sections keep their document order. Anchors and `<<` merge keys are
//! resolved, so a section can inherit `base_url` from another one. A section
//! name that appears twice makes the whole file invalid.

use crate::error::Web2DocError;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, error, warn};

/// One unit of work: fetch `url`, write `{output_dir}/{filename}.{ext}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlTask {
    pub filename: String,
    pub url: String,
}

impl UrlTask {
    /// Build a task from a section name, its base URL and one path suffix.
    ///
    /// The URL is plain concatenation; no slash is inserted or removed.
    pub fn from_section(section: &str, base_url: &str, suffix: &str) -> Self {
        Self {
            filename: format!("{}_{}", section, suffix.replace('/', "_")),
            url: format!("{base_url}{suffix}"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SectionSpec {
    base_url: String,
    urls: Vec<String>,
}

/// Load tasks from a YAML file, logging and swallowing any error.
///
/// A broken file yields an empty list; callers treat "no tasks" as a valid
/// outcome. Use [`try_load_tasks`] to see the error.
pub fn load_tasks(path: impl AsRef<Path>) -> Vec<UrlTask> {
    match try_load_tasks(path) {
        Ok(tasks) => tasks,
        Err(e) => {
            error!("Error loading task file: {}", e);
            Vec::new()
        }
    }
}

/// Load tasks from a YAML file.
pub fn try_load_tasks(path: impl AsRef<Path>) -> Result<Vec<UrlTask>, Web2DocError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| Web2DocError::ConfigLoad {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let tasks = parse_tasks(&content).map_err(|e| match e {
        Web2DocError::ConfigLoad { detail, .. } => Web2DocError::ConfigLoad {
            path: path.to_path_buf(),
            detail,
        },
        other => other,
    })?;

    debug!("Loaded {} tasks from {}", tasks.len(), path.display());
    Ok(tasks)
}

/// Parse tasks from YAML text.
///
/// Errors carry an empty path; [`try_load_tasks`] fills it in.
pub fn parse_tasks(yaml: &str) -> Result<Vec<UrlTask>, Web2DocError> {
    let mut doc: Value = serde_yaml::from_str(yaml).map_err(structural)?;
    doc.apply_merge().map_err(structural)?;

    let sections = match doc {
        Value::Null => return Ok(Vec::new()),
        Value::Mapping(m) => m,
        other => {
            return Err(structural(format!(
                "top level must be a mapping of sections, found {}",
                value_kind(&other)
            )))
        }
    };

    let tasks = tasks_from_sections(sections)?;
    warn_on_duplicate_filenames(&tasks);
    Ok(tasks)
}

fn tasks_from_sections(sections: Mapping) -> Result<Vec<UrlTask>, Web2DocError> {
    let mut tasks = Vec::new();

    for (key, value) in sections {
        let section = section_name(&key)?;
        let spec: SectionSpec = serde_yaml::from_value(value)
            .map_err(|e| structural(format!("section '{section}': {e}")))?;

        tasks.extend(
            spec.urls
                .iter()
                .map(|suffix| UrlTask::from_section(&section, &spec.base_url, suffix)),
        );
    }

    Ok(tasks)
}

fn section_name(key: &Value) -> Result<String, Web2DocError> {
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(structural(format!(
            "section names must be scalars, found {}",
            value_kind(other)
        ))),
    }
}

fn warn_on_duplicate_filenames(tasks: &[UrlTask]) {
    let mut seen = HashSet::new();
    for task in tasks {
        if !seen.insert(task.filename.as_str()) {
            warn!(
                "Duplicate output name '{}' ({}); the later task overwrites the earlier file",
                task.filename, task.url
            );
        }
    }
}

fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

fn structural(detail: impl std::fmt::Display) -> Web2DocError {
    Web2DocError::ConfigLoad {
        path: Default::default(),
        detail: detail.to_string(),
    }
}
