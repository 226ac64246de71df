//! Document converters: webpage → PDF, webpage → Markdown, PDF → Markdown.
//!
//! Each converter is a single attempt. Failures are logged with the URL or
//! path at the converter boundary and returned as [`TaskError`]; nothing is
//! retried and no partial output file is left behind (all writes go through
//! [`crate::output::write_atomic`]).
//!
//! Browser work is blocking, so each webpage conversion runs its whole
//! session inside one `spawn_blocking` call; the session is opened and closed
//! on that thread through [`with_session`].

use crate::config::ConverterOptions;
use crate::error::TaskError;
use crate::output::write_atomic_async;
use crate::pipeline::browser::{
    pick_user_agent, with_session, BrowserDriver, PageSession, SessionOptions,
};
use crate::pipeline::{isolate, markdown, pdf_text};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

// ── Webpage → PDF ────────────────────────────────────────────────────────

/// Prints the content region of a page to PDF.
///
/// Steps: open a session with a random user agent, navigate, wait for the
/// content selector, pause, hide everything outside the content, pause,
/// `Page.printToPDF` with background graphics, write the bytes.
#[derive(Clone)]
pub struct WebpageToPdfConverter {
    driver: Arc<dyn BrowserDriver>,
    options: ConverterOptions,
}

impl WebpageToPdfConverter {
    pub fn new(driver: Arc<dyn BrowserDriver>, options: ConverterOptions) -> Self {
        Self { driver, options }
    }

    pub async fn convert(
        &self,
        url: &str,
        output_path: impl AsRef<Path>,
        content_selector: &str,
    ) -> Result<PathBuf, TaskError> {
        let output_path = output_path.as_ref().to_path_buf();
        let result = self.convert_inner(url, &output_path, content_selector).await;
        if let Err(ref e) = result {
            error!("Error in WebpageToPdfConverter for URL {}: {}", url, e);
        }
        result
    }

    async fn convert_inner(
        &self,
        url: &str,
        output_path: &Path,
        content_selector: &str,
    ) -> Result<PathBuf, TaskError> {
        let pacing = self.options.pacing;
        let timeout = Duration::from_secs(self.options.wait_timeout_secs);
        let url_owned = url.to_string();
        let selector = content_selector.to_string();

        let pdf = run_session(&self.driver, &self.options, move |session| {
            session.navigate(&url_owned)?;
            session.wait_for_element(&selector, timeout)?;
            pacing.pause_blocking();
            isolate::isolate_content(session, &selector)?;
            pacing.pause_blocking();
            session.print_to_pdf(true)
        })
        .await?;

        if !pdf.starts_with(b"%PDF") {
            return Err(TaskError::Conversion {
                detail: format!("print-to-PDF returned {} bytes without a PDF header", pdf.len()),
            });
        }

        write_atomic_async(output_path.to_path_buf(), pdf).await?;
        info!("PDF saved to {}", output_path.display());
        Ok(output_path.to_path_buf())
    }
}

// ── Webpage → Markdown ───────────────────────────────────────────────────

/// Extracts the content element's outer HTML and writes it as Markdown.
#[derive(Clone)]
pub struct WebpageToMarkdownConverter {
    driver: Arc<dyn BrowserDriver>,
    options: ConverterOptions,
}

impl WebpageToMarkdownConverter {
    pub fn new(driver: Arc<dyn BrowserDriver>, options: ConverterOptions) -> Self {
        Self { driver, options }
    }

    pub async fn convert(
        &self,
        url: &str,
        markdown_path: impl AsRef<Path>,
        content_selector: &str,
    ) -> Result<PathBuf, TaskError> {
        let markdown_path = markdown_path.as_ref().to_path_buf();
        let result = self.convert_inner(url, &markdown_path, content_selector).await;
        if let Err(ref e) = result {
            error!("Error in WebpageToMarkdownConverter for URL {}: {}", url, e);
        }
        result
    }

    async fn convert_inner(
        &self,
        url: &str,
        markdown_path: &Path,
        content_selector: &str,
    ) -> Result<PathBuf, TaskError> {
        info!("Processing URL: {}", url);

        let timeout = Duration::from_secs(self.options.wait_timeout_secs);
        let url_owned = url.to_string();
        let selector = content_selector.to_string();

        let html = run_session(&self.driver, &self.options, move |session| {
            session.navigate(&url_owned)?;
            session.wait_for_element(&selector, timeout)?;
            info!(
                "Page loaded successfully. Extracting content from: {}",
                selector
            );
            session.outer_html(&selector)
        })
        .await?;

        let markdown = markdown::html_to_markdown(&html)?;
        if markdown.trim().is_empty() {
            return Err(TaskError::EmptyContent {
                source_name: url.to_string(),
            });
        }

        write_atomic_async(markdown_path.to_path_buf(), markdown.into_bytes()).await?;
        info!("Markdown content saved to {}", markdown_path.display());
        Ok(markdown_path.to_path_buf())
    }
}

// ── PDF → Markdown ───────────────────────────────────────────────────────

/// Concatenates the extracted text of every PDF page into a Markdown file.
///
/// Independent of the browser; needs a pdfium library at runtime (see
/// [`pdf_text::bind_pdfium`]).
#[derive(Debug, Clone, Default)]
pub struct PdfToMarkdownConverter {
    password: Option<String>,
}

impl PdfToMarkdownConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// User password for encrypted PDFs.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub async fn convert(
        &self,
        pdf_path: impl AsRef<Path>,
        markdown_path: impl AsRef<Path>,
    ) -> Result<PathBuf, TaskError> {
        let pdf_path = pdf_path.as_ref();
        let markdown_path = markdown_path.as_ref().to_path_buf();

        let result = async {
            let pages = pdf_text::extract_page_texts(pdf_path, self.password.as_deref()).await?;
            let text = pdf_text::join_pages(&pages);
            write_atomic_async(markdown_path.clone(), text.into_bytes()).await?;
            info!(
                "Extracted {} pages from {} → {}",
                pages.len(),
                pdf_path.display(),
                markdown_path.display()
            );
            Ok::<_, TaskError>(markdown_path.clone())
        }
        .await;

        if let Err(ref e) = result {
            error!("Error in PdfToMarkdownConverter for {}: {}", pdf_path.display(), e);
        }
        result
    }
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Run one browser session on the blocking pool.
async fn run_session<T, F>(
    driver: &Arc<dyn BrowserDriver>,
    options: &ConverterOptions,
    f: F,
) -> Result<T, TaskError>
where
    T: Send + 'static,
    F: FnOnce(&mut dyn PageSession) -> Result<T, TaskError> + Send + 'static,
{
    let driver = Arc::clone(driver);
    let session_options = SessionOptions {
        headless: options.headless,
        user_agent: pick_user_agent(&options.user_agents),
    };

    tokio::task::spawn_blocking(move || with_session(driver.as_ref(), &session_options, f))
        .await
        .map_err(|e| TaskError::Script {
            detail: format!("Browser task panicked: {e}"),
        })?
}
