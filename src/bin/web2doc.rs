//! CLI binary for edgequake-web2doc.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ProcessorConfig`, runs the task pipeline and prints a summary.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_web2doc::{
    load_tasks, ChromeDriver, OutputFormat, Pacing, PdfToMarkdownConverter, ProcessorConfig,
    ProgressCallback, RunProgressCallback, RunSummary, UrlProcessor, UrlTask,
    DEFAULT_CONTENT_SELECTOR,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::error;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar over the task list plus a log line per
/// finished task.
struct CliProgressCallback {
    bar: ProgressBar,
    started: Mutex<Option<Instant>>,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} urls  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Processing URLs");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            started: Mutex::new(None),
            errors: AtomicUsize::new(0),
        })
    }

    fn elapsed_secs(&self) -> f64 {
        self.started
            .lock()
            .ok()
            .and_then(|mut s| s.take())
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl RunProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total_tasks: usize, max_tasks: Option<usize>) {
        self.bar.set_length(total_tasks as u64);
        let cap = match max_tasks {
            Some(n) => format!(" (at most {n} this run)"),
            None => String::new(),
        };
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("{total_tasks} tasks loaded{cap}"))
        ));
    }

    fn on_task_start(&self, _index: usize, task: &UrlTask) {
        if let Ok(mut s) = self.started.lock() {
            *s = Some(Instant::now());
        }
        self.bar.set_message(task.filename.clone());
    }

    fn on_task_converted(&self, _index: usize, task: &UrlTask, path: &Path) {
        self.bar.println(format!(
            "  {} {:<40}  {}  {}",
            green("✓"),
            task.filename,
            dim(&path.display().to_string()),
            dim(&format!("{:.1}s", self.elapsed_secs())),
        ));
        self.bar.inc(1);
    }

    fn on_task_skipped(&self, _index: usize, task: &UrlTask) {
        self.bar.println(format!(
            "  {} {:<40}  {}",
            yellow("–"),
            task.filename,
            yellow(&format!("invalid URL: {}", task.url)),
        ));
        self.bar.inc(1);
    }

    fn on_task_failed(&self, _index: usize, task: &UrlTask, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);

        // Truncate very long error messages to keep output tidy.
        let msg = if error.chars().count() > 80 {
            format!("{}\u{2026}", error.chars().take(79).collect::<String>())
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} {:<40}  {}  {}",
            red("✗"),
            task.filename,
            red(&msg),
            dim(&format!("{:.1}s", self.elapsed_secs())),
        ));
        self.bar.inc(1);
    }

    fn on_run_complete(&self, summary: &RunSummary) {
        self.bar.finish_and_clear();
        let errors = self.errors.load(Ordering::SeqCst);
        if errors > 0 {
            eprintln!(
                "{} {} of {} attempted tasks failed; see the log above",
                red("✗"),
                errors,
                summary.attempted()
            );
        }
        if summary.not_attempted > 0 {
            eprintln!(
                "{} Max limit reached: {} tasks left for a later run",
                cyan("◆"),
                summary.not_attempted
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert the first task of url_tasks.yaml to Markdown in ./output
  web2doc

  # Convert every task, as PDF, into ./archive
  web2doc --all --format pdf --output-dir archive url_tasks.yaml

  # A different content element and a longer wait
  web2doc --selector "article.main" --wait-timeout 30 docs.yaml

  # Convert an existing PDF to Markdown (no browser needed)
  web2doc --pdf-to-markdown guide.pdf -o guide.md

  # Machine-readable run summary
  web2doc --all --json > summary.json

TASK FILE (YAML):
  guides:
    base_url: https://docs.example.com/
    urls:
      - getting-started        # → output/guides_getting-started.md
      - reference/cli          # → output/guides_reference_cli.md

EXIT STATUS:
  0 even when individual tasks fail (see the log and the summary);
  1 with --fail-on-error if any task failed or the run could not start.

ENVIRONMENT VARIABLES:
  RUST_LOG                Override log filter (e.g. RUST_LOG=debug)
  PDFIUM_LIB_PATH         Path to libpdfium for --pdf-to-markdown
"#;

/// Archive documentation pages to Markdown or PDF through headless Chrome.
#[derive(Parser, Debug)]
#[command(
    name = "web2doc",
    version,
    about = "Archive documentation pages to Markdown or PDF through headless Chrome",
    long_about = "Reads a YAML task file of documentation URLs, loads each page in headless \
Chrome, waits for the main content element, and saves it as Markdown (outer HTML → Markdown) \
or as a PDF printed with everything but the content hidden.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// YAML task file.
    #[arg(default_value = "url_tasks.yaml", env = "WEB2DOC_TASKS")]
    tasks: PathBuf,

    /// Directory receiving the converted documents.
    #[arg(long, env = "WEB2DOC_OUTPUT_DIR", default_value = "output")]
    output_dir: PathBuf,

    /// Output document type.
    #[arg(long, env = "WEB2DOC_FORMAT", value_enum, default_value = "markdown")]
    format: FormatArg,

    /// Maximum number of tasks attempted in this run.
    #[arg(long, env = "WEB2DOC_MAX_TASKS", default_value_t = 1,
          value_parser = clap::value_parser!(u64).range(1..))]
    max_tasks: u64,

    /// Process every task (ignores --max-tasks).
    #[arg(long, env = "WEB2DOC_ALL")]
    all: bool,

    /// CSS selector of the main content element.
    #[arg(long, env = "WEB2DOC_SELECTOR", default_value = DEFAULT_CONTENT_SELECTOR)]
    selector: String,

    /// Seconds to wait for the content element.
    #[arg(long, env = "WEB2DOC_WAIT_TIMEOUT", default_value_t = 10,
          value_parser = clap::value_parser!(u64).range(1..))]
    wait_timeout: u64,

    /// Disable the randomised pauses between steps and tasks.
    #[arg(long, env = "WEB2DOC_NO_PACING")]
    no_pacing: bool,

    /// Show the browser window.
    #[arg(long, env = "WEB2DOC_HEADED")]
    headed: bool,

    /// Path to the Chrome/Chromium binary (auto-detected when omitted).
    #[arg(long, env = "WEB2DOC_CHROME")]
    chrome: Option<PathBuf>,

    /// Convert this PDF to Markdown instead of running the task file.
    #[arg(long, value_name = "PDF")]
    pdf_to_markdown: Option<PathBuf>,

    /// Markdown output path for --pdf-to-markdown (default: PDF path with .md).
    #[arg(short, long, requires = "pdf_to_markdown")]
    output: Option<PathBuf>,

    /// Print the run summary as JSON on stdout.
    #[arg(long, env = "WEB2DOC_JSON")]
    json: bool,

    /// Exit with status 1 if any task failed.
    #[arg(long, env = "WEB2DOC_FAIL_ON_ERROR")]
    fail_on_error: bool,

    /// Disable progress bar.
    #[arg(long, env = "WEB2DOC_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "WEB2DOC_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "WEB2DOC_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum FormatArg {
    Markdown,
    Pdf,
}

impl From<FormatArg> for OutputFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Markdown => OutputFormat::Markdown,
            FormatArg::Pdf => OutputFormat::Pdf,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // With the progress bar active only warnings and errors are logged; the
    // bar already reports every task.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && cli.pdf_to_markdown.is_none();
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else if show_progress {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let failed = match run(&cli, show_progress).await {
        Ok(failed) => failed,
        Err(e) => {
            error!("{:#}", e);
            true
        }
    };

    if failed && cli.fail_on_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Run the selected mode. Returns `true` when something failed.
async fn run(cli: &Cli, show_progress: bool) -> Result<bool> {
    // ── PDF → Markdown mode ──────────────────────────────────────────────
    if let Some(ref pdf) = cli.pdf_to_markdown {
        let target = cli
            .output
            .clone()
            .unwrap_or_else(|| edgequake_web2doc::pipeline::pdf_text::markdown_path_for(pdf));
        let ok = PdfToMarkdownConverter::new().convert(pdf, &target).await.is_ok();
        if ok && !cli.quiet {
            eprintln!("{}  {}", green("✔"), bold(&target.display().to_string()));
        }
        return Ok(!ok);
    }

    // ── Task pipeline ────────────────────────────────────────────────────
    let tasks = load_tasks(&cli.tasks);
    let config = build_config(cli)?;

    let driver = match cli.chrome {
        Some(ref path) => ChromeDriver::with_chrome_path(path),
        None => ChromeDriver::new(),
    };

    let mut processor = UrlProcessor::new(tasks, config, Arc::new(driver))
        .context("Failed to set up the pipeline")?;

    if show_progress {
        let cb: ProgressCallback = CliProgressCallback::new();
        processor = processor.with_progress(cb);
    }

    let summary = processor.process().await;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?
        );
    } else if !cli.quiet {
        print_summary(&summary);
    }

    Ok(summary.has_failures())
}

/// Map CLI args to `ProcessorConfig`.
fn build_config(cli: &Cli) -> Result<ProcessorConfig> {
    let max_tasks = if cli.all {
        None
    } else {
        Some(cli.max_tasks as usize)
    };
    let pacing = if cli.no_pacing {
        Pacing::none()
    } else {
        Pacing::default()
    };

    ProcessorConfig::builder()
        .output_dir(&cli.output_dir)
        .format(cli.format.clone().into())
        .max_tasks(max_tasks)
        .content_selector(&cli.selector)
        .wait_timeout_secs(cli.wait_timeout)
        .pacing(pacing)
        .headless(!cli.headed)
        .build()
        .context("Invalid configuration")
}

fn print_summary(summary: &RunSummary) {
    let mark = if summary.failed == 0 {
        green("✔")
    } else if summary.converted == 0 {
        red("✘")
    } else {
        cyan("⚠")
    };
    eprintln!(
        "{}  {} converted  {} failed  {} skipped  {} not attempted  {}",
        mark,
        bold(&summary.converted.to_string()),
        if summary.failed > 0 {
            red(&summary.failed.to_string())
        } else {
            summary.failed.to_string()
        },
        summary.skipped,
        summary.not_attempted,
        dim(&format!("{}ms", summary.total_duration_ms)),
    );
}
