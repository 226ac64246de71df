//! Configuration types for the archival pipeline.
//!
//! All pipeline behaviour is controlled through [`ProcessorConfig`], built
//! via its [`ProcessorConfigBuilder`]. The defaults reproduce the classic
//! behaviour of the tool: Markdown output into `output/`, the standard
//! documentation-site content selector, a 10 second element wait, 3.5–5.5 s
//! pauses, and at most one task per run.

use crate::error::Web2DocError;
use crate::pipeline::browser::DEFAULT_USER_AGENTS;
use crate::pipeline::pacing::Pacing;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Content selector used when none is configured.
pub const DEFAULT_CONTENT_SELECTOR: &str = "#main > div.doc-content-wrapper > div.doc-content";

/// Output directory used when none is configured.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Default element-wait timeout in seconds.
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 10;

/// Default per-run task cap.
///
/// One task per run is the long-standing behaviour and is kept as the
/// default; pass `None` to [`ProcessorConfigBuilder::max_tasks`] (CLI
/// `--all`) to process the whole list.
pub const DEFAULT_MAX_TASKS: Option<usize> = Some(1);

/// Longest single pause accepted by [`ProcessorConfigBuilder::build`].
pub const MAX_PAUSE_SECS: f64 = 3600.0;

/// Configuration for a [`crate::processor::UrlProcessor`] run.
///
/// # Example
/// ```rust
/// use edgequake_web2doc::{OutputFormat, ProcessorConfig};
///
/// let config = ProcessorConfig::builder()
///     .output_dir("archive")
///     .format(OutputFormat::Pdf)
///     .max_tasks(None)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_tasks, None);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Directory receiving `{filename}.md` / `{filename}.pdf`. Default: `output`.
    pub output_dir: PathBuf,

    /// Which converter each task runs. Default: [`OutputFormat::Markdown`].
    pub format: OutputFormat,

    /// Maximum number of tasks attempted per run. `None` = no limit.
    /// Default: `Some(1)`.
    ///
    /// Invalid URLs are skipped without counting against the cap; failed
    /// conversions do count.
    pub max_tasks: Option<usize>,

    /// CSS selector of the element holding the page's main content.
    pub content_selector: String,

    /// How long to wait for the content selector to match. Default: 10 s.
    pub wait_timeout_secs: u64,

    /// Pause policy between browser steps and between tasks.
    pub pacing: Pacing,

    /// Run the browser without a window. Default: true.
    pub headless: bool,

    /// User agents drawn at random for each session.
    pub user_agents: Vec<String>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            format: OutputFormat::default(),
            max_tasks: DEFAULT_MAX_TASKS,
            content_selector: DEFAULT_CONTENT_SELECTOR.to_string(),
            wait_timeout_secs: DEFAULT_WAIT_TIMEOUT_SECS,
            pacing: Pacing::default(),
            headless: true,
            user_agents: DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ProcessorConfig {
    /// Create a new builder for `ProcessorConfig`.
    pub fn builder() -> ProcessorConfigBuilder {
        ProcessorConfigBuilder {
            config: Self::default(),
        }
    }

    /// Converter settings derived from this pipeline config.
    pub fn converter_options(&self) -> ConverterOptions {
        ConverterOptions {
            wait_timeout_secs: self.wait_timeout_secs,
            pacing: self.pacing,
            headless: self.headless,
            user_agents: self.user_agents.clone(),
        }
    }
}

/// Builder for [`ProcessorConfig`].
#[derive(Debug)]
pub struct ProcessorConfigBuilder {
    config: ProcessorConfig,
}

impl ProcessorConfigBuilder {
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn max_tasks(mut self, cap: Option<usize>) -> Self {
        self.config.max_tasks = cap;
        self
    }

    pub fn content_selector(mut self, selector: impl Into<String>) -> Self {
        self.config.content_selector = selector.into();
        self
    }

    pub fn wait_timeout_secs(mut self, secs: u64) -> Self {
        self.config.wait_timeout_secs = secs;
        self
    }

    pub fn pacing(mut self, pacing: Pacing) -> Self {
        self.config.pacing = pacing;
        self
    }

    pub fn headless(mut self, v: bool) -> Self {
        self.config.headless = v;
        self
    }

    pub fn user_agents(mut self, agents: Vec<String>) -> Self {
        self.config.user_agents = agents;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ProcessorConfig, Web2DocError> {
        let c = &self.config;
        if c.content_selector.trim().is_empty() {
            return Err(Web2DocError::InvalidConfig(
                "Content selector must not be empty".into(),
            ));
        }
        if c.wait_timeout_secs == 0 {
            return Err(Web2DocError::InvalidConfig(
                "Wait timeout must be ≥ 1 second".into(),
            ));
        }
        if c.max_tasks == Some(0) {
            return Err(Web2DocError::InvalidConfig(
                "max_tasks must be ≥ 1 (use None for no limit)".into(),
            ));
        }
        if c.user_agents.is_empty() {
            return Err(Web2DocError::InvalidConfig(
                "User-agent pool must not be empty".into(),
            ));
        }
        let p = &c.pacing;
        if !(p.base_secs.is_finite() && p.jitter_min_secs.is_finite() && p.jitter_max_secs.is_finite())
            || p.base_secs + p.jitter_max_secs > MAX_PAUSE_SECS
        {
            return Err(Web2DocError::InvalidConfig(format!(
                "Pacing must be finite and at most {MAX_PAUSE_SECS} s per pause, got base {} jitter [{}, {}]",
                p.base_secs, p.jitter_min_secs, p.jitter_max_secs
            )));
        }
        if c.pacing.jitter_min_secs > c.pacing.jitter_max_secs {
            return Err(Web2DocError::InvalidConfig(format!(
                "Pacing jitter range is inverted: {} > {}",
                c.pacing.jitter_min_secs, c.pacing.jitter_max_secs
            )));
        }
        Ok(self.config)
    }
}

/// Settings shared by the webpage converters.
#[derive(Debug, Clone, PartialEq)]
pub struct ConverterOptions {
    pub wait_timeout_secs: u64,
    pub pacing: Pacing,
    pub headless: bool,
    pub user_agents: Vec<String>,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        ProcessorConfig::default().converter_options()
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Document type produced for each task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Content element → Markdown via outer HTML. (default)
    #[default]
    Markdown,
    /// Whole page with everything but the content hidden → printed PDF.
    Pdf,
}

impl OutputFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Pdf => "pdf",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_behaviour() {
        let c = ProcessorConfig::default();
        assert_eq!(c.output_dir, PathBuf::from("output"));
        assert_eq!(c.format, OutputFormat::Markdown);
        assert_eq!(c.max_tasks, Some(1));
        assert_eq!(c.content_selector, DEFAULT_CONTENT_SELECTOR);
        assert_eq!(c.wait_timeout_secs, 10);
        assert_eq!(c.pacing, Pacing::default());
        assert!(c.headless);
        assert_eq!(c.user_agents.len(), 3);
    }

    #[test]
    fn builder_rejects_zero_cap() {
        let err = ProcessorConfig::builder().max_tasks(Some(0)).build().unwrap_err();
        assert!(err.to_string().contains("max_tasks"));
    }

    #[test]
    fn builder_rejects_empty_selector_and_timeout() {
        assert!(ProcessorConfig::builder().content_selector("  ").build().is_err());
        assert!(ProcessorConfig::builder().wait_timeout_secs(0).build().is_err());
        assert!(ProcessorConfig::builder().user_agents(vec![]).build().is_err());
    }

    #[test]
    fn builder_rejects_inverted_jitter() {
        let pacing = Pacing {
            base_secs: 1.0,
            jitter_min_secs: 2.0,
            jitter_max_secs: 1.0,
        };
        assert!(ProcessorConfig::builder().pacing(pacing).build().is_err());
    }

    #[test]
    fn extension_per_format() {
        assert_eq!(OutputFormat::Markdown.extension(), "md");
        assert_eq!(OutputFormat::Pdf.extension(), "pdf");
    }

    #[test]
    fn builder_rejects_non_finite_pacing() {
        for bad in [f64::NAN, f64::INFINITY, 1e300] {
            let pacing = Pacing {
                base_secs: bad,
                ..Pacing::default()
            };
            assert!(
                ProcessorConfig::builder().pacing(pacing).build().is_err(),
                "accepted base {bad}"
            );
        }
        let pacing = Pacing {
            jitter_max_secs: f64::INFINITY,
            ..Pacing::default()
        };
        assert!(ProcessorConfig::builder().pacing(pacing).build().is_err());
    }
}
